#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal_macros::dec;
use spendscope::{
    config::Config,
    domain::{Category, ContextId, ContextRef, PaymentMethod, Record, RecordKind, RecordState},
    engine::{InMemoryRecordStorage, ReferenceData},
    Session,
};

pub struct Fixture {
    pub session: Session,
    pub outcomes: Arc<InMemoryRecordStorage>,
    pub incomes: Arc<InMemoryRecordStorage>,
    pub food: Category,
    pub rent: Category,
    pub salary: Category,
    pub card: PaymentMethod,
}

pub fn period(id: &str) -> ContextRef {
    ContextRef::Period(ContextId::parse(id).expect("context id"))
}

pub fn group(id: &str) -> ContextRef {
    ContextRef::Group(ContextId::parse(id).expect("context id"))
}

/// A session over in-memory storage seeded for period `2024-03`.
pub fn fixture() -> Fixture {
    let food = Category::new("Food", "rgba(255, 99, 132, 1)");
    let rent = Category::new("Rent", "rgba(54, 162, 235, 1)");
    let salary = Category::new("Salary", "rgba(75, 192, 192, 1)");
    let card = PaymentMethod::new("Card");

    let march = period("2024-03");
    let outcomes = Arc::new(InMemoryRecordStorage::new(RecordKind::Outcome).with_records(
        march.clone(),
        vec![
            Record::outcome(march.clone(), dec!(10), Some(food.id))
                .with_payment_method(card.id)
                .with_responsible("ana")
                .with_state(RecordState::Paid),
            Record::outcome(march.clone(), dec!(5), Some(food.id))
                .with_responsible("ben")
                .with_state(RecordState::Pending),
            Record::outcome(march.clone(), dec!(100), Some(rent.id))
                .with_payment_method(card.id)
                .with_responsible("ana")
                .with_state(RecordState::Paid),
        ],
    ));
    let incomes = Arc::new(InMemoryRecordStorage::new(RecordKind::Income).with_records(
        march.clone(),
        vec![Record::income(march, dec!(200), Some(salary.id)).with_responsible("ana")],
    ));

    let reference = ReferenceData::new(
        vec![food.clone(), rent.clone(), salary.clone()],
        vec![card.clone()],
    );
    let config = Config {
        default_user_id: Some("user-1".into()),
        ..Config::default()
    };
    let session = Session::new(config, reference, outcomes.clone(), incomes.clone())
        .expect("session");

    Fixture {
        session,
        outcomes,
        incomes,
        food,
        rent,
        salary,
        card,
    }
}
