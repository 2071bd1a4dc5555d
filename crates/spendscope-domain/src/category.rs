//! Read-only reference entities: categories and payment methods.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Classifies records for filtering and charting.
///
/// `color` holds the border-intensity CSS colour (for example
/// `rgba(201, 12, 15, 1)`); tables and charts share it so a category keeps
/// the same colour everywhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
        }
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A way of paying for an outcome (card, cash, transfer...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentMethod {
    pub id: Uuid,
    pub name: String,
}

impl PaymentMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

impl Identifiable for PaymentMethod {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for PaymentMethod {
    fn name(&self) -> &str {
        &self.name
    }
}
