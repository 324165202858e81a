//! Shared evaluation date.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::observer::{Observable, Observer};
use crate::types::Date;

/// The date market data is evaluated at.
///
/// Term structures with a moving reference date hold an
/// `Arc<EvaluationDate>` and are notified when it is moved.
pub struct EvaluationDate {
    date: RwLock<Date>,
    observable: Observable,
}

impl EvaluationDate {
    /// Creates an evaluation date.
    #[must_use]
    pub fn new(date: Date) -> Self {
        Self {
            date: RwLock::new(date),
            observable: Observable::new(),
        }
    }

    /// Creates a shared evaluation date.
    #[must_use]
    pub fn shared(date: Date) -> Arc<Self> {
        Arc::new(Self::new(date))
    }

    /// The current evaluation date.
    pub fn date(&self) -> Date {
        *self.date.read()
    }

    /// Moves the evaluation date. Observers are notified if it changed.
    pub fn set(&self, date: Date) {
        let changed = {
            let mut current = self.date.write();
            let changed = *current != date;
            *current = date;
            changed
        };
        if changed {
            log::debug!("evaluation date moved to {date}");
            self.observable.notify();
        }
    }

    /// Registers an observer.
    pub fn subscribe(&self, observer: Weak<dyn Observer>) {
        self.observable.register(observer);
    }
}

impl fmt::Debug for EvaluationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationDate")
            .field("date", &self.date())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Observer for Counter {
        fn update(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_set_notifies_on_change() {
        let eval = EvaluationDate::new(Date::from_ymd(2024, 1, 15).unwrap());
        let counter = Arc::new(Counter::default());
        let observer: Arc<dyn Observer> = counter.clone();
        eval.subscribe(Arc::downgrade(&observer));

        eval.set(Date::from_ymd(2024, 1, 15).unwrap());
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);

        eval.set(Date::from_ymd(2024, 1, 16).unwrap());
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(eval.date(), Date::from_ymd(2024, 1, 16).unwrap());
    }
}
