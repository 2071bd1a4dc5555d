use std::sync::Arc;

use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::{
    lifecycle::{RequestOutcome, RequestStatus, RequestTracker},
    memory::InMemoryRecordStorage,
    resolver::ContextResolver,
    CoreError,
};
use spendscope_domain::{ContextId, ContextKind, ContextRef, Record, RecordKind};

fn group(id: &str) -> ContextRef {
    ContextRef::Group(ContextId::parse(id).expect("context id"))
}

fn outcome_resolver() -> (Arc<InMemoryRecordStorage>, ContextResolver) {
    let storage = Arc::new(InMemoryRecordStorage::new(RecordKind::Outcome));
    let resolver = ContextResolver::new(storage.clone(), RequestTracker::new());
    (storage, resolver)
}

#[test]
fn resolve_requires_exactly_one_context() {
    let (_, resolver) = outcome_resolver();

    let handle = resolver.resolve(Some("g1"), None).expect("group handle");
    assert_eq!(handle.context(), &group("g1"));

    let handle = resolver.resolve(Some(""), Some("p1")).expect("period handle");
    assert_eq!(handle.context().kind(), ContextKind::Period);

    assert!(matches!(
        resolver.resolve(Some("g1"), Some("p1")),
        Err(CoreError::Configuration(_))
    ));
    assert!(matches!(
        resolver.resolve(None, Some("  ")),
        Err(CoreError::Configuration(_))
    ));
}

#[test]
fn list_is_empty_before_any_fetch() {
    let (storage, resolver) = outcome_resolver();
    let handle = resolver.resolve(Some("g1"), None).unwrap();
    assert!(handle.list().is_empty());
    assert_eq!(storage.list_calls(), 0);
}

#[tokio::test]
async fn validation_rejects_before_any_request() {
    let (storage, resolver) = outcome_resolver();
    let handle = resolver.resolve(Some("g1"), None).unwrap();

    let negative = Record::outcome(group("g1"), dec!(-1), Some(Uuid::new_v4()));
    assert!(matches!(
        handle.add(negative).await,
        Err(CoreError::Validation(_))
    ));

    let uncategorised = Record::outcome(group("g1"), dec!(5), None);
    assert!(matches!(
        handle.add(uncategorised).await,
        Err(CoreError::Validation(_))
    ));

    let income = Record::income(group("g1"), dec!(5), Some(Uuid::new_v4()));
    assert!(matches!(
        handle.add(income).await,
        Err(CoreError::Validation(_))
    ));

    let unsaved = Record::outcome(group("g1"), dec!(5), Some(Uuid::new_v4()));
    assert!(matches!(
        handle.update(unsaved).await,
        Err(CoreError::Validation(_))
    ));

    assert_eq!(storage.create_calls(), 0);
    assert_eq!(storage.update_calls(), 0);
    assert!(resolver.tracker().is_idle());
    assert!(handle.list().is_empty());
}

#[tokio::test]
async fn add_forces_the_handle_context() {
    let (storage, resolver) = outcome_resolver();
    let handle = resolver.resolve(None, Some("p7")).unwrap();

    let record = Record::outcome(group("somewhere-else"), dec!(3), Some(Uuid::new_v4()));
    let created = handle.add(record).await.expect("add");

    assert!(created.id.is_some());
    assert_eq!(created.context, *handle.context());
    assert_eq!(storage.snapshot(handle.context()).len(), 1);
    assert_eq!(handle.list(), vec![created]);
}

#[tokio::test]
async fn incomes_are_stored_without_payment_method() {
    let storage = Arc::new(InMemoryRecordStorage::new(RecordKind::Income));
    let resolver = ContextResolver::new(storage.clone(), RequestTracker::new());
    let handle = resolver.resolve(None, Some("p7")).unwrap();

    let record = Record::income(handle.context().clone(), dec!(40), Some(Uuid::new_v4()))
        .with_payment_method(Uuid::new_v4());
    let created = handle.add(record).await.expect("add");

    assert_eq!(created.payment_method_id, None);
    assert_eq!(storage.snapshot(handle.context())[0].payment_method_id, None);
}

#[tokio::test]
async fn save_dispatches_on_id() {
    let (storage, resolver) = outcome_resolver();
    let handle = resolver.resolve(Some("g1"), None).unwrap();
    let category = Some(Uuid::new_v4());

    let created = handle
        .save(Record::outcome(group("g1"), dec!(10), category))
        .await
        .unwrap();
    let mut edited = created.clone();
    edited.amount = dec!(12.75);
    let saved = handle.save(edited).await.unwrap();

    assert_eq!(storage.create_calls(), 1);
    assert_eq!(storage.update_calls(), 1);
    assert_eq!(saved.id, created.id);
    let listed = handle.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].amount, dec!(12.75));
}

#[tokio::test]
async fn transport_failure_marks_the_lane_failed() {
    let (storage, resolver) = outcome_resolver();
    let handle = resolver.resolve(Some("g1"), None).unwrap();
    storage.fail_with("connection reset");

    let err = handle.fetch("user-1").await.unwrap_err();
    assert_eq!(err, CoreError::Transport("connection reset".into()));

    let tracker = resolver.tracker();
    assert_eq!(tracker.status(ContextKind::Group), RequestStatus::Failed);
    assert!(!tracker.is_loading());
    assert_eq!(
        tracker.acknowledge(ContextKind::Group).unwrap(),
        RequestOutcome::Failed("Transport error: connection reset".into())
    );

    storage.clear_failure();
    handle.fetch("user-1").await.expect("manual retry");
    assert_eq!(storage.list_calls(), 2);
    assert_eq!(tracker.status(ContextKind::Group), RequestStatus::Succeeded);
}

#[test]
fn drafts_are_kept_per_context_kind() {
    let (_, resolver) = outcome_resolver();
    let group_handle = resolver.resolve(Some("g1"), None).unwrap();
    let period_handle = resolver.resolve(None, Some("p1")).unwrap();

    let draft = Record::outcome(group("g1"), dec!(1), None);
    group_handle.set_draft(Some(draft.clone()));

    assert_eq!(group_handle.draft(), Some(draft));
    assert_eq!(period_handle.draft(), None);

    group_handle.set_draft(None);
    assert_eq!(group_handle.draft(), None);
}

#[tokio::test]
async fn reset_clears_cached_collections() {
    let storage = Arc::new(
        InMemoryRecordStorage::new(RecordKind::Outcome).with_records(
            group("g1"),
            vec![Record::outcome(group("g1"), dec!(4), Some(Uuid::new_v4()))],
        ),
    );
    let resolver = ContextResolver::new(storage.clone(), RequestTracker::new());
    let handle = resolver.resolve(Some("g1"), None).unwrap();

    handle.fetch("u").await.unwrap();
    handle.fetch("u").await.unwrap();
    assert_eq!(storage.list_calls(), 1);

    resolver.reset();
    assert!(handle.list().is_empty());
    handle.fetch("u").await.unwrap();
    assert_eq!(storage.list_calls(), 2);
}
