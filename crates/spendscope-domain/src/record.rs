//! Monetary records (outcomes and incomes) owned by a group or period.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::context::ContextRef;

/// Distinguishes expenses from earnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Outcome,
    Income,
}

impl RecordKind {
    /// Only outcomes carry a payment method and a date.
    pub fn has_payment_details(self) -> bool {
        matches!(self, RecordKind::Outcome)
    }

    /// Plural label used for chart titles and storage folders.
    pub fn plural(self) -> &'static str {
        match self {
            RecordKind::Outcome => "Outcomes",
            RecordKind::Income => "Incomes",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Outcome => "outcome",
            RecordKind::Income => "income",
        };
        f.write_str(label)
    }
}

/// Settlement state of a period-scoped record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordState {
    Pending,
    Paid,
}

impl RecordState {
    pub fn label(self) -> &'static str {
        match self {
            RecordState::Pending => "Pending",
            RecordState::Paid => "Paid",
        }
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single outcome or income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// `None` until the storage collaborator has saved the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub kind: RecordKind,
    pub context: ContextRef,
    pub amount: Decimal,
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub responsible: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RecordState>,
}

impl Record {
    /// Creates an unsaved draft with empty free-text fields.
    pub fn draft(
        kind: RecordKind,
        context: ContextRef,
        amount: Decimal,
        category_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: None,
            kind,
            context,
            amount,
            category_id,
            payment_method_id: None,
            record_date: None,
            description: String::new(),
            responsible: String::new(),
            state: None,
        }
    }

    pub fn outcome(context: ContextRef, amount: Decimal, category_id: Option<Uuid>) -> Self {
        Self::draft(RecordKind::Outcome, context, amount, category_id)
    }

    pub fn income(context: ContextRef, amount: Decimal, category_id: Option<Uuid>) -> Self {
        Self::draft(RecordKind::Income, context, amount, category_id)
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_payment_method(mut self, payment_method_id: Uuid) -> Self {
        self.payment_method_id = Some(payment_method_id);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.record_date = Some(date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_responsible(mut self, responsible: impl Into<String>) -> Self {
        self.responsible = responsible.into();
        self
    }

    pub fn with_state(mut self, state: RecordState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }
}

impl Amounted for Record {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl BelongsToCategory for Record {
    fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }
}
