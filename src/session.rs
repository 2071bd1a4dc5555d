//! The surface screens talk to.
//!
//! A [`Session`] wires one resolver per record kind to a shared lifecycle
//! tracker and the pre-loaded reference data, and exposes record handles,
//! listings, facets, charts and the loading flag.

use std::{path::PathBuf, sync::Arc};

use tracing::{info, warn};

use spendscope_config::{Config, ConfigManager};
use spendscope_core::{
    build_chart_report, derive_facets, ChartReport, ContextHandle, ContextResolver, Facet,
    FacetFilter, FacetOption, Listing, RecordStorage, ReferenceData, RequestOutcome,
    RequestTracker,
};
use spendscope_domain::{ContextKind, RecordKind};
use spendscope_storage_json::{load_reference_data, JsonRecordStorage};

use crate::errors::{Result, SpendscopeError};

pub struct Session {
    config: Config,
    reference: ReferenceData,
    tracker: RequestTracker,
    outcomes: ContextResolver,
    incomes: ContextResolver,
}

impl Session {
    /// Builds a session over explicit storage collaborators.
    ///
    /// Each storage must serve the record kind its slot names.
    pub fn new(
        config: Config,
        reference: ReferenceData,
        outcome_storage: Arc<dyn RecordStorage>,
        income_storage: Arc<dyn RecordStorage>,
    ) -> Result<Self> {
        for (expected, storage) in [
            (RecordKind::Outcome, &outcome_storage),
            (RecordKind::Income, &income_storage),
        ] {
            if storage.kind() != expected {
                return Err(SpendscopeError::Setup(format!(
                    "{expected} storage serves {} records",
                    storage.kind()
                )));
            }
        }
        let tracker = RequestTracker::new();
        Ok(Self {
            outcomes: ContextResolver::new(outcome_storage, tracker.clone()),
            incomes: ContextResolver::new(income_storage, tracker.clone()),
            config,
            reference,
            tracker,
        })
    }

    /// Opens JSON storage under the configured data root.
    pub async fn open(config: Config) -> Result<Self> {
        let root = config.resolve_data_root();
        let reference = load_reference_data(&root).await?;
        info!(
            root = %root.display(),
            categories = reference.categories.len(),
            payment_methods = reference.payment_methods.len(),
            "session opened"
        );
        let outcomes = Arc::new(JsonRecordStorage::new(&root, RecordKind::Outcome));
        let incomes = Arc::new(JsonRecordStorage::new(&root, RecordKind::Income));
        Self::new(config, reference, outcomes, incomes)
    }

    /// Loads the config kept under `base` and opens its data root.
    pub async fn open_from_dir(base: PathBuf) -> Result<Self> {
        let config = ConfigManager::with_base_dir(base)?.load()?;
        Self::open(config).await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    pub fn resolver(&self, kind: RecordKind) -> &ContextResolver {
        match kind {
            RecordKind::Outcome => &self.outcomes,
            RecordKind::Income => &self.incomes,
        }
    }

    /// Handle for the group or period a screen was opened with.
    pub fn records(
        &self,
        kind: RecordKind,
        group_id: Option<&str>,
        period_id: Option<&str>,
    ) -> Result<ContextHandle> {
        Ok(self.resolver(kind).resolve(group_id, period_id)?)
    }

    /// Resolves the context and loads its records unless already cached.
    pub async fn open_records(
        &self,
        kind: RecordKind,
        group_id: Option<&str>,
        period_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<ContextHandle> {
        let handle = self.records(kind, group_id, period_id)?;
        handle.fetch(self.config.user_or_default(user_id)).await?;
        Ok(handle)
    }

    /// Table of the handle's cached records.
    pub fn listing(&self, handle: &ContextHandle, filters: &[FacetFilter]) -> Listing {
        Listing::build(
            handle.context().kind(),
            handle.kind(),
            &handle.list(),
            &self.reference,
            filters,
        )
    }

    pub fn facets(&self, handle: &ContextHandle, facet: Facet) -> Vec<FacetOption> {
        derive_facets(&handle.list(), facet, &self.reference)
    }

    /// Charts for a period, fetching whichever side is not cached yet.
    ///
    /// A failed fetch does not abort the report: the failure stays on the
    /// period lane and the charts use what is available.
    pub async fn period_charts(
        &self,
        period_id: &str,
        user_id: Option<&str>,
    ) -> Result<ChartReport> {
        let outcomes = self.records(RecordKind::Outcome, None, Some(period_id))?;
        let incomes = self.records(RecordKind::Income, None, Some(period_id))?;
        let user_id = self.config.user_or_default(user_id);

        let (outcome_fetch, income_fetch) =
            tokio::join!(outcomes.fetch(user_id), incomes.fetch(user_id));
        for (kind, result) in [
            (RecordKind::Outcome, outcome_fetch),
            (RecordKind::Income, income_fetch),
        ] {
            if let Err(err) = result {
                warn!(%kind, period_id, error = %err, "chart data incomplete");
            }
        }

        let outcome_records = outcomes.list();
        let income_records = incomes.list();
        Ok(build_chart_report(
            Some(income_records.as_slice()),
            Some(outcome_records.as_slice()),
            &self.reference.categories,
        ))
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.is_loading()
    }

    /// Clears every finished lane and reports how each request ended.
    pub fn acknowledge(&self) -> Vec<(ContextKind, RequestOutcome)> {
        self.tracker.acknowledge_all()
    }

    /// Drops all cached records of both kinds.
    pub fn reset(&self) {
        self.outcomes.reset();
        self.incomes.reset();
    }
}
