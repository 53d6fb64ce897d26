//! Error types for the Tenor core crate.
//!
//! Covers invalid dates and periods, empty handles, unset quotes, and
//! failures collected while notifying observers.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A period string or length could not be interpreted.
    #[error("Invalid period: {reason}")]
    InvalidPeriod {
        /// Description of the problem.
        reason: String,
    },

    /// A handle was dereferenced while nothing was linked to it.
    #[error("Empty handle: no {target} linked")]
    EmptyHandle {
        /// Type name of the expected target.
        target: &'static str,
    },

    /// A quote was read before any value was set.
    #[error("Quote has no value set")]
    QuoteNotSet,

    /// Calendar or business day error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },

    /// An observer failed while handling a notification.
    #[error("Observer update failed: {reason}")]
    UpdateFailed {
        /// Description of the failure.
        reason: String,
    },

    /// One or more observers failed during a notification pass.
    ///
    /// Every registered observer is still notified; `first` is the first
    /// failure seen.
    #[error("{failures} observer(s) failed during notification; first: {first}")]
    NotificationFailed {
        /// Number of observers whose update failed.
        failures: usize,
        /// The first failure encountered.
        first: Box<CoreError>,
    },

    /// Invalid input parameters.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(reason: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            reason: reason.into(),
        }
    }

    /// Creates an empty handle error for the given target type.
    #[must_use]
    pub fn empty_handle<T: ?Sized>() -> Self {
        Self::EmptyHandle {
            target: std::any::type_name::<T>(),
        }
    }

    /// Creates an observer update failure.
    #[must_use]
    pub fn update_failed(reason: impl Into<String>) -> Self {
        Self::UpdateFailed {
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
