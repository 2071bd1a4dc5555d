use std::{collections::HashSet, fs, sync::Arc};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use spendscope_core::{ContextResolver, CoreError, RecordStorage, ReferenceData, RequestTracker};
use spendscope_domain::{
    Category, ContextId, ContextRef, PaymentMethod, Record, RecordKind, RecordState,
};
use spendscope_storage_json::{load_reference_data, save_reference_data, JsonRecordStorage};
use tempfile::tempdir;
use uuid::Uuid;

fn period(id: &str) -> ContextRef {
    ContextRef::Period(ContextId::parse(id).expect("context id"))
}

#[tokio::test]
async fn json_storage_assigns_ids_and_reloads_records() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonRecordStorage::new(dir.path(), RecordKind::Outcome);
    let context = period("2024-06");

    let draft = Record::outcome(context.clone(), dec!(42.10), Some(Uuid::new_v4()))
        .with_state(RecordState::Pending)
        .with_description("groceries");
    let created = storage.create(&context, draft).await.expect("create");
    assert!(created.id.is_some());

    let path = storage.context_path(&context);
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert!(path.starts_with(dir.path().join("outcomes")));

    let reopened = JsonRecordStorage::new(dir.path(), RecordKind::Outcome);
    let loaded = reopened.list(&context, "user-1").await.expect("list");
    assert_eq!(loaded, vec![created]);
}

#[tokio::test]
async fn contexts_and_kinds_are_stored_apart() {
    let dir = tempdir().expect("tempdir");
    let outcomes = JsonRecordStorage::new(dir.path(), RecordKind::Outcome);
    let incomes = JsonRecordStorage::new(dir.path(), RecordKind::Income);
    let group = ContextRef::Group(ContextId::parse("p1").expect("id"));
    let category = Some(Uuid::new_v4());

    outcomes
        .create(&period("p1"), Record::outcome(period("p1"), dec!(1), category))
        .await
        .expect("create outcome");
    incomes
        .create(&period("p1"), Record::income(period("p1"), dec!(2), category))
        .await
        .expect("create income");

    assert_eq!(outcomes.list(&period("p1"), "u").await.unwrap().len(), 1);
    assert_eq!(incomes.list(&period("p1"), "u").await.unwrap().len(), 1);
    assert!(outcomes.list(&group, "u").await.unwrap().is_empty());
}

#[tokio::test]
async fn ids_differing_in_case_or_punctuation_get_their_own_files() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonRecordStorage::new(dir.path(), RecordKind::Outcome);
    let ids = ["AbC123", "abc123", "a b", "a_b", "a/b"];

    let paths: HashSet<_> = ids.iter().map(|id| storage.context_path(&period(id))).collect();
    assert_eq!(paths.len(), ids.len());

    let category = Some(Uuid::new_v4());
    for (amount, id) in ids.iter().enumerate() {
        let context = period(id);
        storage
            .create(&context, Record::outcome(context.clone(), Decimal::from(amount), category))
            .await
            .expect("create");
    }

    for (amount, id) in ids.iter().enumerate() {
        let context = period(id);
        let listed = storage.list(&context, "u").await.expect("list");
        assert_eq!(listed.len(), 1, "records under {id}");
        assert_eq!(listed[0].amount, Decimal::from(amount));
        assert_eq!(listed[0].context, context);
    }

    let doomed = storage.list(&period("AbC123"), "u").await.unwrap()[0]
        .id
        .expect("id");
    let err = storage.delete(&period("abc123"), doomed).await.unwrap_err();
    assert_eq!(err, CoreError::RecordNotFound(doomed));
}

#[tokio::test]
async fn update_stores_the_record_under_its_file_context() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonRecordStorage::new(dir.path(), RecordKind::Outcome);
    let context = period("p1");

    let mut record = storage
        .create(&context, Record::outcome(context.clone(), dec!(5), Some(Uuid::new_v4())))
        .await
        .expect("create");
    record.context = period("stale");
    record.kind = RecordKind::Income;

    let updated = storage.update(&context, record).await.expect("update");
    assert_eq!(updated.context, context);
    assert_eq!(updated.kind, RecordKind::Outcome);

    let stored = storage.list(&context, "u").await.unwrap();
    assert_eq!(stored, vec![updated]);
}

#[tokio::test]
async fn update_and_delete_rewrite_the_file() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonRecordStorage::new(dir.path(), RecordKind::Outcome);
    let context = period("p1");

    let mut record = storage
        .create(&context, Record::outcome(context.clone(), dec!(5), Some(Uuid::new_v4())))
        .await
        .expect("create");
    record.amount = dec!(6.5);
    storage.update(&context, record.clone()).await.expect("update");

    let stored = storage.list(&context, "u").await.unwrap();
    assert_eq!(stored[0].amount, dec!(6.5));

    let id = record.id.expect("id");
    storage.delete(&context, id).await.expect("delete");
    assert!(storage.list(&context, "u").await.unwrap().is_empty());

    let err = storage.delete(&context, id).await.unwrap_err();
    assert_eq!(err, CoreError::RecordNotFound(id));
}

#[tokio::test]
async fn corrupt_files_surface_as_transport_errors() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonRecordStorage::new(dir.path(), RecordKind::Income);
    let context = period("broken");
    let path = storage.context_path(&context);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(&path, "[{").expect("write");

    let err = storage.list(&context, "u").await.unwrap_err();
    assert!(matches!(err, CoreError::Transport(_)));
}

#[tokio::test]
async fn resolver_works_on_top_of_json_storage() {
    let dir = tempdir().expect("tempdir");
    let storage = Arc::new(JsonRecordStorage::new(dir.path(), RecordKind::Outcome));
    let resolver = ContextResolver::new(storage, RequestTracker::new());
    let handle = resolver.resolve(Some("household"), None).expect("handle");

    let saved = handle
        .save(Record::outcome(handle.context().clone(), dec!(15), Some(Uuid::new_v4())))
        .await
        .expect("save");

    resolver.reset();
    handle.fetch("u").await.expect("fetch");
    assert_eq!(handle.list(), vec![saved]);
}

#[tokio::test]
async fn reference_data_round_trips() {
    let dir = tempdir().expect("tempdir");
    assert!(load_reference_data(dir.path())
        .await
        .expect("missing file")
        .categories
        .is_empty());

    let reference = ReferenceData::new(
        vec![Category::new("Food", "rgba(1,2,3,1)")],
        vec![PaymentMethod::new("Card")],
    );
    save_reference_data(dir.path(), &reference)
        .await
        .expect("save reference");

    let loaded = load_reference_data(dir.path()).await.expect("load");
    assert_eq!(loaded.categories, reference.categories);
    assert_eq!(loaded.payment_methods, reference.payment_methods);
}
