//! Market quotes.
//!
//! A [`Quote`] is a shared, externally mutated market value. Consumers hold
//! `Arc<dyn Quote>` handles and subscribe to be told when the value changes.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::observer::{Observable, Observer};

/// A market value with change notification.
pub trait Quote: Send + Sync {
    /// Current value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidQuote` if the quote has no valid value.
    fn value(&self) -> CoreResult<f64>;

    /// Returns true if a value is available.
    fn is_valid(&self) -> bool;

    /// Registers an observer notified on every value change.
    fn subscribe(&self, observer: Weak<dyn Observer>);
}

/// A quote holding a settable value.
///
/// Observers are notified only when the stored value actually changes.
#[derive(Default)]
pub struct SimpleQuote {
    value: RwLock<Option<f64>>,
    observable: Observable,
}

impl SimpleQuote {
    /// Creates a quote with a value.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value: RwLock::new(Some(value)),
            observable: Observable::new(),
        }
    }

    /// Creates a quote without a value.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a shared quote handle.
    #[must_use]
    pub fn shared(value: f64) -> Arc<Self> {
        Arc::new(Self::new(value))
    }

    /// Sets the value and returns the difference to the previous one
    /// (zero if there was none).
    pub fn set_value(&self, value: f64) -> f64 {
        let previous = {
            let mut slot = self.value.write();
            let previous = *slot;
            *slot = Some(value);
            previous
        };

        let changed = previous.map_or(true, |p| p.to_bits() != value.to_bits());
        if changed {
            self.observable.notify();
        }
        previous.map_or(0.0, |p| value - p)
    }

    /// Clears the value. Observers are notified if a value was present.
    pub fn reset(&self) {
        let had_value = self.value.write().take().is_some();
        if had_value {
            self.observable.notify();
        }
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> CoreResult<f64> {
        (*self.value.read()).ok_or_else(|| CoreError::invalid_quote("quote has no value"))
    }

    fn is_valid(&self) -> bool {
        self.value.read().is_some()
    }

    fn subscribe(&self, observer: Weak<dyn Observer>) {
        self.observable.register(observer);
    }
}

impl fmt::Debug for SimpleQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleQuote")
            .field("value", &*self.value.read())
            .field("observers", &self.observable)
            .finish()
    }
}

type QuoteFn = dyn Fn(f64) -> f64 + Send + Sync;

/// A quote whose value is a function of another quote.
///
/// Changes of the underlying quote are forwarded to this quote's observers.
pub struct DerivedQuote {
    underlying: Arc<dyn Quote>,
    function: Box<QuoteFn>,
    relay: Arc<Relay>,
}

struct Relay {
    observable: Observable,
}

impl Observer for Relay {
    fn update(&self) {
        self.observable.notify();
    }
}

impl DerivedQuote {
    /// Creates a derived quote over `underlying`.
    pub fn new<F>(underlying: Arc<dyn Quote>, function: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let relay = Arc::new(Relay {
            observable: Observable::new(),
        });
        let relay_observer: Arc<dyn Observer> = relay.clone();
        underlying.subscribe(Arc::downgrade(&relay_observer));

        Self {
            underlying,
            function: Box::new(function),
            relay,
        }
    }

    /// The underlying quote.
    #[must_use]
    pub fn underlying(&self) -> &Arc<dyn Quote> {
        &self.underlying
    }
}

impl Quote for DerivedQuote {
    fn value(&self) -> CoreResult<f64> {
        let value = (self.function)(self.underlying.value()?);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(CoreError::invalid_quote(format!(
                "derived quote produced a non-finite value ({value})"
            )))
        }
    }

    fn is_valid(&self) -> bool {
        self.underlying.is_valid()
    }

    fn subscribe(&self, observer: Weak<dyn Observer>) {
        self.relay.observable.register(observer);
    }
}

impl fmt::Debug for DerivedQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedQuote")
            .field("value", &self.value().ok())
            .finish()
    }
}
