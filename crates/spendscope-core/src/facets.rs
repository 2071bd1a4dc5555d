//! Distinct filter values present in a record collection.

use std::{collections::HashSet, fmt};

use tracing::debug;
use uuid::Uuid;

use spendscope_domain::{ListingColumn, Record, RecordState};

use crate::reference::ReferenceData;

/// Record attribute offered as a filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Category,
    PaymentMethod,
    Responsible,
    State,
}

impl Facet {
    pub const ALL: [Facet; 4] = [
        Facet::Category,
        Facet::PaymentMethod,
        Facet::Responsible,
        Facet::State,
    ];

    pub fn value_of(self, record: &Record) -> FacetValue {
        match self {
            Facet::Category => FacetValue::Reference(record.category_id),
            Facet::PaymentMethod => FacetValue::Reference(record.payment_method_id),
            Facet::Responsible => FacetValue::Text(record.responsible.clone()),
            Facet::State => FacetValue::State(record.state),
        }
    }

    /// Table column the facet filters.
    pub fn column(self) -> ListingColumn {
        match self {
            Facet::Category => ListingColumn::Category,
            Facet::PaymentMethod => ListingColumn::PaymentMethod,
            Facet::Responsible => ListingColumn::Responsible,
            Facet::State => ListingColumn::State,
        }
    }

    fn label_for(self, value: &FacetValue, reference: &ReferenceData) -> Option<String> {
        match (self, value) {
            (Facet::Category, FacetValue::Reference(id)) => reference.category_name(*id),
            (Facet::PaymentMethod, FacetValue::Reference(id)) => {
                reference.payment_method_name(*id)
            }
            (Facet::Responsible, FacetValue::Text(text)) => Some(text.clone()),
            (Facet::State, FacetValue::State(state)) => state.map(|s| s.label().to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column().title())
    }
}

/// Raw value of a facet, compared by exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FacetValue {
    /// Category or payment method id.
    Reference(Option<Uuid>),
    Text(String),
    State(Option<RecordState>),
}

/// One selectable filter entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOption {
    /// `None` when the value no longer resolves (e.g. a deleted category).
    pub label: Option<String>,
    pub value: FacetValue,
}

/// Lists the distinct values of `facet`, in order of first occurrence.
pub fn derive_facets(
    records: &[Record],
    facet: Facet,
    reference: &ReferenceData,
) -> Vec<FacetOption> {
    let mut seen = HashSet::new();
    let mut options = Vec::new();
    for record in records {
        let value = facet.value_of(record);
        if !seen.insert(value.clone()) {
            continue;
        }
        let label = facet.label_for(&value, reference);
        if label.is_none() {
            debug!(%facet, ?value, "facet value has no label");
        }
        options.push(FacetOption { label, value });
    }
    options
}

/// A selected facet value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetFilter {
    pub facet: Facet,
    pub value: FacetValue,
}

impl FacetFilter {
    pub fn new(facet: Facet, value: FacetValue) -> Self {
        Self { facet, value }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.facet.value_of(record) == self.value
    }
}

/// Records matching every filter; no filters keeps everything.
pub fn filter_records<'a>(records: &'a [Record], filters: &[FacetFilter]) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|record| filters.iter().all(|filter| filter.matches(record)))
        .collect()
}
