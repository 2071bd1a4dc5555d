//! Table view of a context's records.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use spendscope_domain::{ContextKind, ListingColumn, Record, RecordKind};

use crate::{
    facets::{derive_facets, filter_records, Facet, FacetFilter, FacetOption},
    reference::ReferenceData,
};

/// A record with its reference ids resolved to labels.
///
/// Cells of hidden columns are left empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRow {
    pub record: Record,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub state: Option<&'static str>,
}

/// Visible columns, filter options, filtered rows and their footer total.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub context: ContextKind,
    pub kind: RecordKind,
    pub columns: Vec<ListingColumn>,
    pub facets: Vec<(Facet, Vec<FacetOption>)>,
    pub rows: Vec<ListingRow>,
    pub total: Decimal,
}

impl Listing {
    /// Facets offered for the visible columns.
    pub fn available_facets(context: ContextKind, kind: RecordKind) -> Vec<Facet> {
        Facet::ALL
            .into_iter()
            .filter(|facet| facet.column().is_visible_for(context, kind))
            .collect()
    }

    /// Facet options come from the whole collection; rows and total only
    /// from the records passing `filters`.
    pub fn build(
        context: ContextKind,
        kind: RecordKind,
        records: &[Record],
        reference: &ReferenceData,
        filters: &[FacetFilter],
    ) -> Self {
        let columns = ListingColumn::visible_for(context, kind);
        let shows = |column: ListingColumn| columns.contains(&column);

        let facets = Self::available_facets(context, kind)
            .into_iter()
            .map(|facet| (facet, derive_facets(records, facet, reference)))
            .collect();

        let rows: Vec<ListingRow> = filter_records(records, filters)
            .into_iter()
            .map(|record| ListingRow {
                date: record.record_date.filter(|_| shows(ListingColumn::Date)),
                category: reference.category_name(record.category_id),
                payment_method: if shows(ListingColumn::PaymentMethod) {
                    reference.payment_method_name(record.payment_method_id)
                } else {
                    None
                },
                state: record
                    .state
                    .filter(|_| shows(ListingColumn::State))
                    .map(|state| state.label()),
                record: record.clone(),
            })
            .collect();
        let total = rows.iter().map(|row| row.record.amount).sum();

        Self {
            context,
            kind,
            columns,
            facets,
            rows,
            total,
        }
    }

    pub fn facet_options(&self, facet: Facet) -> &[FacetOption] {
        self.facets
            .iter()
            .find(|(candidate, _)| *candidate == facet)
            .map(|(_, options)| options.as_slice())
            .unwrap_or_default()
    }
}
