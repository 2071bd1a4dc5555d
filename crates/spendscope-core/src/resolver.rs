//! One record API for both parent scopes.
//!
//! [`ContextResolver`] owns the per-context record cache for one record kind
//! and hands out [`ContextHandle`]s bound to a single group or period. Every
//! handle operation goes through the same code path whatever the context
//! kind; only the lifecycle lane differs.

use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, PoisonError, RwLock},
};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use spendscope_domain::{ContextId, ContextKind, ContextRef, Record, RecordKind};

use crate::{lifecycle::RequestTracker, storage::RecordStorage, CoreError};

#[derive(Debug, Default)]
struct RecordCache {
    collections: HashMap<ContextRef, Vec<Record>>,
    drafts: HashMap<ContextKind, Record>,
}

type SharedCache = Arc<RwLock<RecordCache>>;

fn read_cache<R>(cache: &SharedCache, f: impl FnOnce(&RecordCache) -> R) -> R {
    let guard = cache.read().unwrap_or_else(PoisonError::into_inner);
    f(&guard)
}

fn write_cache<R>(cache: &SharedCache, f: impl FnOnce(&mut RecordCache) -> R) -> R {
    let mut guard = cache.write().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Routes record operations for one [`RecordKind`] to the right context.
#[derive(Clone)]
pub struct ContextResolver {
    kind: RecordKind,
    storage: Arc<dyn RecordStorage>,
    cache: SharedCache,
    tracker: RequestTracker,
}

impl ContextResolver {
    /// The record kind is taken from `storage`.
    pub fn new(storage: Arc<dyn RecordStorage>, tracker: RequestTracker) -> Self {
        Self {
            kind: storage.kind(),
            storage,
            cache: SharedCache::default(),
            tracker,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Binds a handle to the group or the period, whichever is supplied.
    ///
    /// Exactly one id must be non-blank.
    pub fn resolve(
        &self,
        group_id: Option<&str>,
        period_id: Option<&str>,
    ) -> Result<ContextHandle, CoreError> {
        let group = group_id.and_then(ContextId::parse);
        let period = period_id.and_then(ContextId::parse);
        let context = match (group, period) {
            (Some(id), None) => ContextRef::Group(id),
            (None, Some(id)) => ContextRef::Period(id),
            (Some(group), Some(period)) => {
                return Err(CoreError::Configuration(format!(
                    "ambiguous context: both group `{group}` and period `{period}` supplied"
                )))
            }
            (None, None) => {
                return Err(CoreError::Configuration(
                    "missing context: neither a group id nor a period id supplied".into(),
                ))
            }
        };
        Ok(self.handle(context))
    }

    pub fn handle(&self, context: ContextRef) -> ContextHandle {
        ContextHandle {
            context,
            kind: self.kind,
            storage: Arc::clone(&self.storage),
            cache: Arc::clone(&self.cache),
            tracker: self.tracker.clone(),
        }
    }

    /// Drops every cached collection and draft; the next fetch hits storage.
    pub fn reset(&self) {
        write_cache(&self.cache, |cache| {
            cache.collections.clear();
            cache.drafts.clear();
        });
        info!(kind = %self.kind, "record cache cleared");
    }
}

/// Record operations bound to a single group or period.
#[derive(Clone)]
pub struct ContextHandle {
    context: ContextRef,
    kind: RecordKind,
    storage: Arc<dyn RecordStorage>,
    cache: SharedCache,
    tracker: RequestTracker,
}

impl ContextHandle {
    pub fn context(&self) -> &ContextRef {
        &self.context
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Records currently known for this context; never fetches.
    pub fn list(&self) -> Vec<Record> {
        read_cache(&self.cache, |cache| {
            cache
                .collections
                .get(&self.context)
                .cloned()
                .unwrap_or_default()
        })
    }

    pub fn is_empty(&self) -> bool {
        read_cache(&self.cache, |cache| {
            cache
                .collections
                .get(&self.context)
                .map_or(true, Vec::is_empty)
        })
    }

    /// Loads the authoritative collection unless one is already cached.
    ///
    /// A non-empty cached collection short-circuits without touching storage
    /// or the lifecycle lane, so external changes stay invisible until
    /// [`ContextResolver::reset`].
    pub async fn fetch(&self, user_id: &str) -> Result<(), CoreError> {
        if !self.is_empty() {
            debug!(context = %self.context, kind = %self.kind, "collection cached, skipping fetch");
            return Ok(());
        }
        debug!(context = %self.context, kind = %self.kind, "fetching records");
        let records = self
            .tracked(self.storage.list(&self.context, user_id))
            .await?;
        let count = records.len();
        write_cache(&self.cache, |cache| {
            cache.collections.insert(self.context.clone(), records);
        });
        info!(context = %self.context, kind = %self.kind, count, "records fetched");
        Ok(())
    }

    /// Creates a new record in this context and appends it to the cache.
    pub async fn add(&self, record: Record) -> Result<Record, CoreError> {
        let record = self.prepare(record)?;
        if let Some(id) = record.id {
            return Err(CoreError::Validation(format!(
                "record {id} already exists; update it instead"
            )));
        }
        let created = self
            .tracked(self.storage.create(&self.context, record))
            .await?;
        write_cache(&self.cache, |cache| {
            cache
                .collections
                .entry(self.context.clone())
                .or_default()
                .push(created.clone());
        });
        debug!(context = %self.context, id = ?created.id, "record added");
        Ok(created)
    }

    /// Saves changes to an existing record and replaces it in the cache.
    pub async fn update(&self, record: Record) -> Result<Record, CoreError> {
        let record = self.prepare(record)?;
        let Some(id) = record.id else {
            return Err(CoreError::Validation(
                "cannot update a record that has no id".into(),
            ));
        };
        let updated = self
            .tracked(self.storage.update(&self.context, record))
            .await?;
        write_cache(&self.cache, |cache| {
            let collection = cache.collections.entry(self.context.clone()).or_default();
            match collection.iter_mut().find(|existing| existing.id == Some(id)) {
                Some(existing) => *existing = updated.clone(),
                None => collection.push(updated.clone()),
            }
        });
        debug!(context = %self.context, %id, "record updated");
        Ok(updated)
    }

    /// Adds drafts and updates saved records.
    pub async fn save(&self, record: Record) -> Result<Record, CoreError> {
        if record.is_draft() {
            self.add(record).await
        } else {
            self.update(record).await
        }
    }

    /// Deletes a record in storage, then drops it from the cache.
    pub async fn delete(&self, record_id: Uuid) -> Result<(), CoreError> {
        self.tracked(self.storage.delete(&self.context, record_id))
            .await?;
        write_cache(&self.cache, |cache| {
            if let Some(collection) = cache.collections.get_mut(&self.context) {
                collection.retain(|record| record.id != Some(record_id));
            }
        });
        debug!(context = %self.context, %record_id, "record deleted");
        Ok(())
    }

    /// Sets the record open for editing; `None` means a new record.
    pub fn set_draft(&self, record: Option<Record>) {
        let lane = self.context.kind();
        write_cache(&self.cache, |cache| match record {
            Some(record) => {
                cache.drafts.insert(lane, record);
            }
            None => {
                cache.drafts.remove(&lane);
            }
        });
    }

    pub fn draft(&self) -> Option<Record> {
        read_cache(&self.cache, |cache| cache.drafts.get(&self.context.kind()).cloned())
    }

    fn prepare(&self, mut record: Record) -> Result<Record, CoreError> {
        if record.kind != self.kind {
            return Err(CoreError::Validation(format!(
                "{} record passed to the {} handle",
                record.kind, self.kind
            )));
        }
        if record.amount < Decimal::ZERO {
            return Err(CoreError::Validation(format!(
                "amount must not be negative (got {})",
                record.amount
            )));
        }
        if record.category_id.is_none() {
            return Err(CoreError::Validation("a category is required".into()));
        }
        if !record.kind.has_payment_details() && record.payment_method_id.take().is_some() {
            debug!(context = %self.context, "payment method dropped from income record");
        }
        record.context = self.context.clone();
        Ok(record)
    }

    async fn tracked<T, F>(&self, request: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        let lane = self.context.kind();
        self.tracker.begin(lane);
        let result = request.await;
        if let Err(err) = self.tracker.complete(lane, &result) {
            warn!(%lane, error = %err, "lifecycle lane out of sync");
        }
        result
    }
}
