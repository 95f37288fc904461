//! Auto-dismiss for transient notification slots.
//!
//! [`watch_messages`] attaches to an error slot and a success slot. Whenever
//! either slot receives a message, a one-shot timer empties that slot again
//! after [`DISMISS_DELAY`]. Each slot has its own timers; writing one slot
//! never touches the other.
//!
//! Overwrites inside the dismiss window are governed by
//! [`DismissOptions::reset_timer_on_overwrite`]:
//!
//! - `true` (default): the pending timer of the slot is aborted and a fresh
//!   window starts, so every message stays visible for the full delay.
//! - `false`: earlier timers keep running and clear whatever the slot holds
//!   when they fire. A message written 1s after another one disappears 59s
//!   after it was written.
//!
//! The returned [`DismissGuard`] owns the subscriptions and the pending
//! timers. Dropping it detaches from both slots and aborts every timer, so
//! nothing is written after the owner has gone away.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::error::NotifyResult;
use crate::slot::{Slot, Subscription};

/// How long a message stays in its slot before it is cleared.
pub const DISMISS_DELAY: Duration = Duration::from_secs(60);

/// Behaviour of the auto-dismiss helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissOptions {
    /// Restart the dismiss window when a slot is overwritten before its
    /// pending timer fired.
    pub reset_timer_on_overwrite: bool,
}

impl Default for DismissOptions {
    fn default() -> Self {
        Self {
            reset_timer_on_overwrite: true,
        }
    }
}

impl DismissOptions {
    /// Options that reproduce fire-and-forget timers: a superseded timer
    /// still clears the slot at its original deadline.
    pub fn legacy() -> Self {
        Self {
            reset_timer_on_overwrite: false,
        }
    }
}

/// Pending dismiss timers of one slot.
///
/// Once closed, every handle handed to [`TimerSet::schedule`] is aborted on
/// arrival. A listener already running from a copied listener list can
/// still schedule after the guard went away.
#[derive(Default)]
struct TimerSet {
    state: Mutex<TimerState>,
}

#[derive(Default)]
struct TimerState {
    handles: Vec<JoinHandle<()>>,
    closed: bool,
}

impl TimerSet {
    fn lock(&self) -> std::sync::MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule(&self, handle: JoinHandle<()>, reset: bool) {
        let mut state = self.lock();
        if state.closed {
            handle.abort();
            return;
        }
        if reset {
            for pending in state.handles.drain(..) {
                pending.abort();
            }
        } else {
            state.handles.retain(|h| !h.is_finished());
        }
        state.handles.push(handle);
    }

    fn pending(&self) -> usize {
        self.lock().handles.iter().filter(|h| !h.is_finished()).count()
    }

    fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        for pending in state.handles.drain(..) {
            pending.abort();
        }
    }
}

/// Owns the watches installed by [`watch_messages`] or [`auto_dismiss`].
///
/// Dropping the guard detaches every watch and aborts all pending timers.
#[must_use = "dropping the guard stops auto-dismissal immediately"]
pub struct DismissGuard {
    subscriptions: Vec<Subscription>,
    timers: Vec<Arc<TimerSet>>,
}

impl DismissGuard {
    /// Number of dismiss timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.timers.iter().map(|t| t.pending()).sum()
    }

    /// Tear down explicitly. Equivalent to dropping the guard.
    pub fn dismiss(self) {}

    fn merge(mut self, mut other: DismissGuard) -> Self {
        self.subscriptions.append(&mut other.subscriptions);
        self.timers.append(&mut other.timers);
        self
    }
}

impl fmt::Debug for DismissGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissGuard")
            .field("watches", &self.subscriptions.len())
            .field("pending_timers", &self.pending_timers())
            .finish()
    }
}

impl Drop for DismissGuard {
    fn drop(&mut self) {
        // Detach first so no new write reaches the watchers.
        self.subscriptions.clear();
        for timers in &self.timers {
            timers.close();
        }
    }
}

/// Clear `slot` [`DISMISS_DELAY`] after every write of a message.
///
/// Must be called from within a tokio runtime; timers are spawned on it.
pub fn auto_dismiss<T>(slot: &Slot<T>, options: DismissOptions) -> NotifyResult<DismissGuard>
where
    T: Clone + PartialEq + Send + 'static,
{
    Ok(watch_slot(slot, "message", Handle::try_current()?, options))
}

/// Clear the error and success slots [`DISMISS_DELAY`] after each message.
///
/// Must be called from within a tokio runtime; timers are spawned on it.
pub fn watch_messages<E, S>(
    error: &Slot<E>,
    success: &Slot<S>,
    options: DismissOptions,
) -> NotifyResult<DismissGuard>
where
    E: Clone + PartialEq + Send + 'static,
    S: Clone + PartialEq + Send + 'static,
{
    let runtime = Handle::try_current()?;
    let errors = watch_slot(error, "error", runtime.clone(), options);
    let successes = watch_slot(success, "success", runtime, options);
    Ok(errors.merge(successes))
}

fn watch_slot<T>(
    slot: &Slot<T>,
    name: &'static str,
    runtime: Handle,
    options: DismissOptions,
) -> DismissGuard
where
    T: Clone + PartialEq + Send + 'static,
{
    let timers = Arc::new(TimerSet::default());
    let target = slot.downgrade();
    let pending = Arc::clone(&timers);

    let subscription = slot.on_change(move |value| {
        if value.is_none() {
            return;
        }

        let deadline = Instant::now() + DISMISS_DELAY;
        let target = target.clone();
        let timer = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            match target.upgrade() {
                Some(slot) => {
                    if slot.clear() {
                        debug!(slot = name, "Notification auto-dismissed");
                    }
                }
                None => debug!(slot = name, "Notification slot dropped before dismiss"),
            }
        });

        debug!(
            slot = name,
            delay_ms = DISMISS_DELAY.as_millis() as u64,
            reset = options.reset_timer_on_overwrite,
            "Scheduled notification dismiss"
        );
        pending.schedule(timer, options.reset_timer_on_overwrite);
    });

    DismissGuard {
        subscriptions: vec![subscription],
        timers: vec![timers],
    }
}
