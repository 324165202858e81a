//! Change notification.
//!
//! Market data that can change (quotes, the evaluation date) owns an
//! [`Observable`]. Dependent objects implement [`Observer`] and register a
//! weak reference, so a subscription never keeps its subscriber alive.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Receives change notifications.
pub trait Observer: Send + Sync {
    /// Called after an observed object changed.
    fn update(&self);
}

/// A registry of weakly held observers.
#[derive(Default)]
pub struct Observable {
    observers: Mutex<Vec<Weak<dyn Observer>>>,
}

impl Observable {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer. Registering the same observer twice has no effect.
    pub fn register(&self, observer: Weak<dyn Observer>) {
        let mut observers = self.observers.lock();
        if !observers.iter().any(|o| Weak::ptr_eq(o, &observer)) {
            observers.push(observer);
        }
    }

    /// Number of live observers.
    pub fn len(&self) -> usize {
        self.observers.lock().iter().filter(|o| o.strong_count() > 0).count()
    }

    /// Returns true if no live observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notifies every live observer and drops the dead ones.
    ///
    /// The lock is released before observers run, so an observer may
    /// register or notify in turn.
    pub fn notify(&self) {
        let live: Vec<Arc<dyn Observer>> = {
            let mut observers = self.observers.lock();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in live {
            observer.update();
        }
    }
}

impl fmt::Debug for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.len())
            .finish()
    }
}
