//! Centralized error types for Yuno.

use thiserror::Error;
use yuno_db::DbError;

/// Main error type for Yuno operations.
#[derive(Error, Debug)]
pub enum YunoError {
    #[error("Project not found: {0}")]
    ProjectNotFound(i64),

    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("Task item not found: {0}")]
    TaskItemNotFound(i64),

    #[error("Invalid task item status: {0}")]
    InvalidStatus(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification error: {0}")]
    Notify(#[from] yuno_notify::NotifyError),
}

/// Result type for Yuno operations.
pub type YunoResult<T> = Result<T, YunoError>;

impl YunoError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Map a database `NotFound` to a domain error, leaving other errors as is.
    pub(crate) fn or_not_found(err: DbError, not_found: impl FnOnce() -> Self) -> Self {
        match err {
            DbError::NotFound(_) => not_found(),
            other => Self::Database(other),
        }
    }
}

/// Reject blank required text fields.
pub(crate) fn require_text(field: &str, value: &str) -> YunoResult<()> {
    if value.trim().is_empty() {
        return Err(YunoError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mapping() {
        let err = YunoError::or_not_found(DbError::NotFound("Task: 3".into()), || {
            YunoError::TaskNotFound(3)
        });
        assert!(matches!(err, YunoError::TaskNotFound(3)));

        let err = YunoError::or_not_found(DbError::LockPoisoned, || YunoError::TaskNotFound(3));
        assert!(matches!(err, YunoError::Database(DbError::LockPoisoned)));
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("Title", "Groceries").is_ok());
        let err = require_text("Title", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Title must not be empty");
    }
}
