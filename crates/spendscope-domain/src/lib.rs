//! spendscope-domain
//!
//! Pure domain models (Record, Category, PaymentMethod, parent contexts).
//! No I/O, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod context;
pub mod listing;
pub mod record;

pub use category::*;
pub use common::*;
pub use context::*;
pub use listing::*;
pub use record::*;
