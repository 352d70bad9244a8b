//! Monitor error types.

use thiserror::Error;

/// Errors returned by the monitor manager.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("monitor with ID {0} not found")]
    NotFound(String),

    #[error("failed to build probe client: {0}")]
    Client(String),

    #[error("monitors must be started inside a tokio runtime")]
    NoRuntime,
}

pub type MonitorResult<T> = Result<T, MonitorError>;
