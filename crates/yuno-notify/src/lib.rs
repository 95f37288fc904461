//! Yuno notification slots.
//!
//! Observable message slots and the auto-dismiss helper that clears
//! transient error/success messages a fixed time after they were written.

pub mod dismiss;
pub mod error;
pub mod slot;

pub use dismiss::{auto_dismiss, watch_messages, DismissGuard, DismissOptions, DISMISS_DELAY};
pub use error::{NotifyError, NotifyResult};
pub use slot::{Slot, Subscription, WeakSlot};
