//! Columns of a record table and the rules that hide them per context.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::ContextKind;
use crate::record::RecordKind;

/// A column of the record table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingColumn {
    Action,
    Date,
    Description,
    Category,
    PaymentMethod,
    Responsible,
    State,
    Amount,
}

impl ListingColumn {
    pub const ALL: [ListingColumn; 8] = [
        ListingColumn::Action,
        ListingColumn::Date,
        ListingColumn::Description,
        ListingColumn::Category,
        ListingColumn::PaymentMethod,
        ListingColumn::Responsible,
        ListingColumn::State,
        ListingColumn::Amount,
    ];

    /// Group listings drop date and state; incomes have no payment details.
    pub fn is_visible_for(self, context: ContextKind, kind: RecordKind) -> bool {
        match self {
            ListingColumn::Date => context.shows_date_and_state() && kind.has_payment_details(),
            ListingColumn::State => context.shows_date_and_state(),
            ListingColumn::PaymentMethod => kind.has_payment_details(),
            ListingColumn::Action
            | ListingColumn::Description
            | ListingColumn::Category
            | ListingColumn::Responsible
            | ListingColumn::Amount => true,
        }
    }

    /// Visible columns in display order.
    pub fn visible_for(context: ContextKind, kind: RecordKind) -> Vec<ListingColumn> {
        Self::ALL
            .into_iter()
            .filter(|column| column.is_visible_for(context, kind))
            .collect()
    }

    pub fn title(self) -> &'static str {
        match self {
            ListingColumn::Action => "Action",
            ListingColumn::Date => "Date",
            ListingColumn::Description => "Description",
            ListingColumn::Category => "Category",
            ListingColumn::PaymentMethod => "Payment Method",
            ListingColumn::Responsible => "Responsible",
            ListingColumn::State => "State",
            ListingColumn::Amount => "Amount",
        }
    }
}

impl fmt::Display for ListingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
