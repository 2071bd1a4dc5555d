use async_trait::async_trait;
use uuid::Uuid;

use spendscope_domain::{ContextRef, Record, RecordKind};

use crate::CoreError;

/// Transport behind record CRUD, keyed by parent context.
///
/// One instance serves one [`RecordKind`]. Every method may fail with
/// [`CoreError::Transport`].
#[async_trait]
pub trait RecordStorage: Send + Sync {
    fn kind(&self) -> RecordKind;

    async fn list(&self, context: &ContextRef, user_id: &str) -> Result<Vec<Record>, CoreError>;

    /// Persists a new record and returns it with its assigned id.
    async fn create(&self, context: &ContextRef, record: Record) -> Result<Record, CoreError>;

    async fn update(&self, context: &ContextRef, record: Record) -> Result<Record, CoreError>;

    async fn delete(&self, context: &ContextRef, record_id: Uuid) -> Result<(), CoreError>;
}
