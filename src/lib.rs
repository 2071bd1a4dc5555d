#![doc(test(attr(deny(warnings))))]

//! Spendscope tracks outcomes and incomes for groups and periods and turns
//! them into filterable listings and per-category charts.

pub mod errors;
pub mod session;
pub mod utils;

pub use spendscope_config as config;
pub use spendscope_core as engine;
pub use spendscope_domain as domain;
pub use spendscope_storage_json as storage;

pub use errors::SpendscopeError;
pub use session::Session;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Spendscope tracing initialized.");
    });
}
