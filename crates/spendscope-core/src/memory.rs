//! In-process storage collaborator.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use async_trait::async_trait;
use uuid::Uuid;

use spendscope_domain::{ContextRef, Record, RecordKind};

use crate::{storage::RecordStorage, CoreError};

#[derive(Debug, Default)]
struct CallCounters {
    list: AtomicUsize,
    create: AtomicUsize,
    update: AtomicUsize,
    delete: AtomicUsize,
}

/// Keeps records in memory and counts every call it receives.
///
/// A failure message set through [`InMemoryRecordStorage::fail_with`] makes
/// every call return [`CoreError::Transport`] until cleared.
#[derive(Debug)]
pub struct InMemoryRecordStorage {
    kind: RecordKind,
    records: Mutex<HashMap<ContextRef, Vec<Record>>>,
    failure: Mutex<Option<String>>,
    calls: CallCounters,
}

impl InMemoryRecordStorage {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            records: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
            calls: CallCounters::default(),
        }
    }

    /// Seeds `context` with `records`, assigning ids to drafts.
    pub fn with_records(self, context: ContextRef, records: Vec<Record>) -> Self {
        let seeded = records
            .into_iter()
            .map(|mut record| {
                record.id.get_or_insert_with(Uuid::new_v4);
                record.context = context.clone();
                record
            })
            .collect();
        self.store().insert(context, seeded);
        self
    }

    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn list_calls(&self) -> usize {
        self.calls.list.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.calls.create.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.calls.update.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.calls.delete.load(Ordering::SeqCst)
    }

    /// Records stored for `context`, bypassing the call counters.
    pub fn snapshot(&self, context: &ContextRef) -> Vec<Record> {
        self.store().get(context).cloned().unwrap_or_default()
    }

    fn store(&self) -> MutexGuard<'_, HashMap<ContextRef, Vec<Record>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, counter: &AtomicUsize) -> Result<(), CoreError> {
        counter.fetch_add(1, Ordering::SeqCst);
        match self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(message) => Err(CoreError::Transport(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStorage for InMemoryRecordStorage {
    fn kind(&self) -> RecordKind {
        self.kind
    }

    async fn list(&self, context: &ContextRef, _user_id: &str) -> Result<Vec<Record>, CoreError> {
        self.check(&self.calls.list)?;
        Ok(self.snapshot(context))
    }

    async fn create(&self, context: &ContextRef, mut record: Record) -> Result<Record, CoreError> {
        self.check(&self.calls.create)?;
        record.id = Some(Uuid::new_v4());
        record.context = context.clone();
        self.store()
            .entry(context.clone())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, context: &ContextRef, record: Record) -> Result<Record, CoreError> {
        self.check(&self.calls.update)?;
        let id = record
            .id
            .ok_or_else(|| CoreError::Validation("cannot update a record that has no id".into()))?;
        let mut store = self.store();
        let existing = store
            .get_mut(context)
            .and_then(|records| records.iter_mut().find(|r| r.id == Some(id)))
            .ok_or(CoreError::RecordNotFound(id))?;
        *existing = record.clone();
        Ok(record)
    }

    async fn delete(&self, context: &ContextRef, record_id: Uuid) -> Result<(), CoreError> {
        self.check(&self.calls.delete)?;
        let mut store = self.store();
        let records = store
            .get_mut(context)
            .ok_or(CoreError::RecordNotFound(record_id))?;
        let before = records.len();
        records.retain(|record| record.id != Some(record_id));
        if records.len() == before {
            return Err(CoreError::RecordNotFound(record_id));
        }
        Ok(())
    }
}
