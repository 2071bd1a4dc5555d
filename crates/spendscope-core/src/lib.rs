//! spendscope-core
//!
//! Record management and aggregation logic shared by group- and
//! period-scoped screens. Depends on spendscope-domain. No rendering and no
//! concrete transport; storage is reached through [`storage::RecordStorage`].

pub mod aggregation;
pub mod error;
pub mod facets;
pub mod lifecycle;
pub mod listing;
pub mod memory;
pub mod reference;
pub mod resolver;
pub mod storage;

pub use aggregation::*;
pub use error::CoreError;
pub use facets::*;
pub use lifecycle::*;
pub use listing::*;
pub use memory::InMemoryRecordStorage;
pub use reference::ReferenceData;
pub use resolver::*;
pub use storage::RecordStorage;

#[cfg(test)]
mod tests;
