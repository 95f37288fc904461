//! Observable single-value slots.
//!
//! A [`Slot`] holds either nothing or one value. Writers replace the value
//! with [`Slot::set`]; watchers register a callback with [`Slot::on_change`]
//! and are told about every write that actually changes the value.
//!
//! Invariants:
//! 1. Writing a value equal to the current one is a no-op (no notification).
//! 2. Listeners run in registration order, outside the slot's lock, so a
//!    listener may read or write the slot it is attached to.
//! 3. Dropping a [`Subscription`] detaches its listener before the next write.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Listener<T> = Arc<dyn Fn(Option<&T>) + Send + Sync>;

struct Inner<T> {
    value: Option<T>,
    listeners: Vec<(u64, Listener<T>)>,
    next_id: u64,
}

/// A shared, observable slot holding at most one value.
///
/// Cloning a `Slot` yields another handle to the same value.
pub struct Slot<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("Slot")
            .field("value", &inner.value)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: None,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }
}

impl<T> Slot<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds `value`.
    pub fn with_value(value: T) -> Self {
        let slot = Self::default();
        lock(&slot.inner).value = Some(value);
        slot
    }

    /// Current value, if any.
    pub fn get(&self) -> Option<T> {
        lock(&self.inner).value.clone()
    }

    /// Whether the slot currently holds nothing.
    pub fn is_empty(&self) -> bool {
        lock(&self.inner).value.is_none()
    }

    /// Replace the slot's value and notify listeners.
    ///
    /// Returns `false` without notifying anyone when `value` equals the
    /// current value.
    pub fn set(&self, value: Option<T>) -> bool {
        let listeners: Vec<Listener<T>> = {
            let mut inner = lock(&self.inner);
            if inner.value == value {
                return false;
            }
            inner.value = value.clone();
            inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        for listener in listeners {
            listener(value.as_ref());
        }
        true
    }

    /// Store `value` in the slot.
    pub fn put(&self, value: T) -> bool {
        self.set(Some(value))
    }

    /// Empty the slot.
    pub fn clear(&self) -> bool {
        self.set(None)
    }

    /// Register a listener called with the new value after every change.
    pub fn on_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<&T>) + Send + Sync + 'static,
    {
        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Arc::new(listener)));
            id
        };

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    /// A handle that does not keep the slot alive.
    pub fn downgrade(&self) -> WeakSlot<T> {
        WeakSlot {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle to a [`Slot`].
pub struct WeakSlot<T> {
    inner: Weak<Mutex<Inner<T>>>,
}

impl<T> Clone for WeakSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> WeakSlot<T> {
    /// Recover the slot if any owning handle is still alive.
    pub fn upgrade(&self) -> Option<Slot<T>> {
        self.inner.upgrade().map(|inner| Slot { inner })
    }
}

/// Detaches a listener from its slot when dropped.
#[must_use = "dropping a Subscription detaches the listener immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Detach the listener now.
    pub fn unsubscribe(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

fn lock<T>(inner: &Mutex<Inner<T>>) -> MutexGuard<'_, Inner<T>> {
    // Listeners never run under the lock, so a poisoned guard still holds a
    // consistent value.
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
