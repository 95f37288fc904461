//! Error types for notification slots.

use thiserror::Error;

/// Errors raised while wiring up notification helpers.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("No async runtime available to schedule dismiss timers: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Result type for notification operations.
pub type NotifyResult<T> = Result<T, NotifyError>;
