//! The evaluation date shared by a family of curves.
//!
//! Curves whose reference date floats with "today" hold an
//! [`EvaluationContext`] and observe it. Changing the date notifies every
//! structure built on the context, which discards anything cached for the
//! previous date.
//!
//! # Example
//!
//! ```rust
//! use tenor_core::settings::EvaluationContext;
//! use tenor_core::types::{Date, TimeUnit};
//!
//! let context = EvaluationContext::with_date(Date::from_ymd(2025, 1, 15).unwrap());
//! context.advance(30, TimeUnit::Days).unwrap();
//! assert_eq!(context.evaluation_date(), Date::from_ymd(2025, 2, 14).unwrap());
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::CoreResult;
use crate::patterns::{AsObservable, Observable};
use crate::types::{Date, Period, TimeUnit};

/// Holds the current evaluation date and publishes its changes.
#[derive(Default)]
pub struct EvaluationContext {
    date: RwLock<Option<Date>>,
    observable: Observable,
}

impl EvaluationContext {
    /// Creates a context that follows the system date until one is set.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a context pinned to `date`.
    #[must_use]
    pub fn with_date(date: Date) -> Arc<Self> {
        Arc::new(Self {
            date: RwLock::new(Some(date)),
            observable: Observable::new(),
        })
    }

    /// The evaluation date in effect now.
    pub fn evaluation_date(&self) -> Date {
        (*self.date.read()).unwrap_or_else(Date::today)
    }

    /// True if a date was set explicitly.
    pub fn is_pinned(&self) -> bool {
        self.date.read().is_some()
    }

    /// Sets the evaluation date and notifies observers.
    ///
    /// Observers are notified even if the date is unchanged.
    ///
    /// # Errors
    ///
    /// Propagates observer failures from the notification pass.
    pub fn set_evaluation_date(&self, date: Date) -> CoreResult<()> {
        let previous = self.date.write().replace(date);
        debug!(?previous, %date, "evaluation date set");
        self.observable.notify_observers()
    }

    /// Moves the evaluation date by `n` calendar units and notifies observers.
    ///
    /// Returns the new evaluation date.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range, or
    /// propagates observer failures.
    pub fn advance(&self, n: i32, unit: TimeUnit) -> CoreResult<Date> {
        let date = self.evaluation_date().add_period(Period::new(n, unit))?;
        self.set_evaluation_date(date)?;
        Ok(date)
    }

    /// Unpins the date so it follows the system date again, notifying observers.
    ///
    /// # Errors
    ///
    /// Propagates observer failures from the notification pass.
    pub fn reset(&self) -> CoreResult<()> {
        self.date.write().take();
        self.observable.notify_observers()
    }
}

impl AsObservable for EvaluationContext {
    fn as_observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("date", &*self.date.read())
            .finish()
    }
}
