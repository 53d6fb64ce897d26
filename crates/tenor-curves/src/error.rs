//! Error types for curve operations.

use tenor_core::types::Date;
use tenor_core::CoreError;
use tenor_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Requested date precedes the curve's reference date.
    #[error("Date {date} is before the reference date {reference}")]
    DateBeforeReference {
        /// The requested date.
        date: Date,
        /// The curve's reference date.
        reference: Date,
    },

    /// Requested date lies past the curve's max date and extrapolation is off.
    #[error("Date {date} is past the max date {max_date}")]
    DateOutOfRange {
        /// The requested date.
        date: Date,
        /// The curve's max date.
        max_date: Date,
    },

    /// Requested time lies outside the curve's range.
    #[error("Time {t:.6} is outside [0, {max:.6}]")]
    TimeOutOfRange {
        /// The requested time in years.
        t: f64,
        /// The curve's max time.
        max: f64,
    },

    /// Forward period with its end before its start.
    #[error("Invalid forward period: {end} is before {start}")]
    InvalidForwardPeriod {
        /// Period start.
        start: Date,
        /// Period end.
        end: Date,
    },

    /// Invalid curve or instrument set-up.
    #[error("Invalid configuration: {reason}")]
    Configuration {
        /// Description of the problem.
        reason: String,
    },

    /// A bootstrap node could not be solved.
    #[error("Bootstrap failed at node {node} ({instrument}, maturity {maturity}): {source}")]
    BootstrapFailed {
        /// Description of the instrument being fitted.
        instrument: String,
        /// Index of the node in maturity order.
        node: usize,
        /// Maturity of the node.
        maturity: Date,
        /// The solver failure.
        #[source]
        source: MathError,
    },

    /// A discount factor that is not strictly positive and finite.
    #[error("Invalid discount factor {value} at t={t:.6}")]
    InvalidDiscount {
        /// Time in years.
        t: f64,
        /// The offending value.
        value: f64,
    },

    /// Error from the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error from the math crate.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl CurveError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Returns true for set-up errors as opposed to numerical or domain errors.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let reference = Date::from_ymd(2025, 1, 15).unwrap();
        let err = CurveError::DateBeforeReference {
            date: Date::from_ymd(2025, 1, 10).unwrap(),
            reference,
        };
        assert!(err.to_string().contains("2025-01-10"));

        let err = CurveError::configuration("duplicate maturity");
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "Invalid configuration: duplicate maturity");
    }

    #[test]
    fn test_bootstrap_failure_carries_source() {
        use std::error::Error as _;

        let err = CurveError::BootstrapFailed {
            instrument: "Swap maturing 2030-01-17".into(),
            node: 6,
            maturity: Date::from_ymd(2030, 1, 17).unwrap(),
            source: MathError::ConvergenceFailed {
                algorithm: "Brent",
                evaluations: 101,
                max_evaluations: 100,
                x_min: 0.7,
                x_max: 0.8,
                last_residual: 1e-6,
            },
        };
        assert!(err.to_string().contains("node 6"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_conversions() {
        let err: CurveError = CoreError::QuoteNotSet.into();
        assert!(matches!(err, CurveError::Core(CoreError::QuoteNotSet)));
        let err: CurveError = MathError::invalid_input("bad").into();
        assert!(matches!(err, CurveError::Math(_)));
    }
}
