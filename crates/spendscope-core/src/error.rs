use thiserror::Error;
use uuid::Uuid;

use crate::lifecycle::RequestStatus;
use spendscope_domain::ContextKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Ambiguous or missing parent context; an integration bug.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Malformed record; the operation was aborted before any mutation.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The storage collaborator failed.
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),
    #[error("Invalid {lane} lane transition from {from:?}: {action}")]
    InvalidTransition {
        lane: ContextKind,
        from: RequestStatus,
        action: &'static str,
    },
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Transport(err.to_string())
    }
}
