//! Observable market quotes.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::patterns::{AsObservable, Observable};

/// An observable scalar market value such as a rate or a spread.
pub trait Quote: AsObservable + Send + Sync + fmt::Debug {
    /// Returns the current value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::QuoteNotSet` if no value is available.
    fn value(&self) -> CoreResult<f64>;

    /// True if a value is available.
    fn is_valid(&self) -> bool {
        self.value().is_ok()
    }
}

/// A quote whose value is set directly by the caller.
///
/// Setting a value notifies observers only when it differs from the stored
/// one under exact `f64` comparison. Values that differ in the last bit
/// still notify.
#[derive(Default)]
pub struct SimpleQuote {
    value: RwLock<Option<f64>>,
    observable: Observable,
}

impl SimpleQuote {
    /// Creates a quote holding `value`.
    #[must_use]
    pub fn new(value: f64) -> Arc<Self> {
        Arc::new(Self {
            value: RwLock::new(Some(value)),
            observable: Observable::new(),
        })
    }

    /// Creates a quote with no value.
    #[must_use]
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Stores `value` and notifies observers if it changed.
    ///
    /// Returns whether observers were notified.
    ///
    /// # Errors
    ///
    /// Propagates observer failures from the notification pass.
    pub fn set_value(&self, value: f64) -> CoreResult<bool> {
        {
            let mut current = self.value.write();
            if *current == Some(value) {
                return Ok(false);
            }
            *current = Some(value);
        }
        self.observable.notify_observers()?;
        Ok(true)
    }

    /// Clears the value, notifying observers if one was set.
    ///
    /// # Errors
    ///
    /// Propagates observer failures from the notification pass.
    pub fn reset(&self) -> CoreResult<bool> {
        if self.value.write().take().is_none() {
            return Ok(false);
        }
        self.observable.notify_observers()?;
        Ok(true)
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> CoreResult<f64> {
        (*self.value.read()).ok_or(CoreError::QuoteNotSet)
    }
}

impl AsObservable for SimpleQuote {
    fn as_observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for SimpleQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleQuote")
            .field("value", &*self.value.read())
            .finish()
    }
}
