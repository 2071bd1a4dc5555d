use spendscope_config::ConfigError;
use spendscope_core::CoreError;
use thiserror::Error;

/// Unified error type for the config, core and storage layers.
#[derive(Debug, Error)]
pub enum SpendscopeError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Session setup failed: {0}")]
    Setup(String),
}

pub type Result<T> = std::result::Result<T, SpendscopeError>;
