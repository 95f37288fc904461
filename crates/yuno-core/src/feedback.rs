//! User-facing command feedback.
//!
//! [`Feedback`] owns the error and success message slots shown by the
//! interactive shell. Every message is cleared automatically one minute after
//! it was written (see [`yuno_notify::watch_messages`]).

use crate::error::YunoResult;
use serde::Serialize;
use tracing::warn;
use yuno_notify::{watch_messages, DismissGuard, Slot};

pub use yuno_notify::{DismissOptions, DISMISS_DELAY};

/// Current messages, for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackSnapshot {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Error and success slots with auto-dismiss attached.
///
/// Dropping `Feedback` stops all pending dismiss timers.
#[derive(Debug)]
pub struct Feedback {
    error: Slot<String>,
    success: Slot<String>,
    guard: DismissGuard,
}

impl Feedback {
    /// Create empty slots and start watching them. Needs a tokio runtime.
    pub fn new(options: DismissOptions) -> YunoResult<Self> {
        let error = Slot::new();
        let success = Slot::new();
        let guard = watch_messages(&error, &success, options)?;
        Ok(Self {
            error,
            success,
            guard,
        })
    }

    /// The error slot.
    pub fn error_slot(&self) -> &Slot<String> {
        &self.error
    }

    /// The success slot.
    pub fn success_slot(&self) -> &Slot<String> {
        &self.success
    }

    /// Show an error message.
    pub fn error(&self, message: impl Into<String>) {
        self.error.put(message.into());
    }

    /// Show a success message.
    pub fn success(&self, message: impl Into<String>) {
        self.success.put(message.into());
    }

    /// Record the outcome of a command and hand the result back.
    ///
    /// `Ok` writes `on_success(&value)` to the success slot; `Err` writes the
    /// error's message to the error slot.
    pub fn report<T, F>(&self, result: YunoResult<T>, on_success: F) -> YunoResult<T>
    where
        F: FnOnce(&T) -> String,
    {
        match &result {
            Ok(value) => self.success(on_success(value)),
            Err(e) => {
                warn!(error = %e, "Command failed");
                self.error(e.to_string());
            }
        }
        result
    }

    /// Current messages.
    pub fn snapshot(&self) -> FeedbackSnapshot {
        FeedbackSnapshot {
            error: self.error.get(),
            success: self.success.get(),
        }
    }

    /// Dismiss timers that have not fired yet.
    pub fn pending_dismissals(&self) -> usize {
        self.guard.pending_timers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::YunoError;
    use std::time::Duration;

    async fn advance(duration: Duration) {
        tokio::time::advance(duration).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_routes_outcomes() {
        let feedback = Feedback::new(DismissOptions::default()).unwrap();

        let ok: YunoResult<i64> = Ok(3);
        assert_eq!(feedback.report(ok, |id| format!("Created task {}", id)).unwrap(), 3);

        let failed: YunoResult<i64> = Err(YunoError::TaskNotFound(9));
        assert!(feedback.report(failed, |_| unreachable!()).is_err());

        assert_eq!(
            feedback.snapshot(),
            FeedbackSnapshot {
                error: Some("Task not found: 9".to_string()),
                success: Some("Created task 3".to_string()),
            }
        );
        assert_eq!(feedback.pending_dismissals(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_messages_expire() {
        let feedback = Feedback::new(DismissOptions::default()).unwrap();
        feedback.error("Disk full");

        advance(DISMISS_DELAY - Duration::from_millis(1)).await;
        assert_eq!(feedback.snapshot().error.as_deref(), Some("Disk full"));

        advance(Duration::from_millis(1)).await;
        assert_eq!(feedback.snapshot(), FeedbackSnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_feedback_stops_timers() {
        let feedback = Feedback::new(DismissOptions::default()).unwrap();
        let success = feedback.success_slot().clone();
        feedback.success("Saved");
        drop(feedback);

        advance(DISMISS_DELAY * 2).await;
        assert_eq!(success.get().as_deref(), Some("Saved"));
        assert_eq!(success.listener_count(), 0);
    }
}
