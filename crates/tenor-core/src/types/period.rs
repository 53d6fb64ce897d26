//! Tenors expressed as a length and a time unit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Days (business days when advanced on a calendar)
    Days,
    /// Weeks
    Weeks,
    /// Months
    Months,
    /// Years
    Years,
}

impl TimeUnit {
    fn suffix(self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        }
    }
}

/// A tenor such as `2D`, `3M` or `10Y`.
///
/// # Example
///
/// ```rust
/// use tenor_core::types::{Period, TimeUnit};
///
/// let tenor: Period = "6M".parse().unwrap();
/// assert_eq!(tenor, Period::new(6, TimeUnit::Months));
/// assert_eq!(tenor.to_string(), "6M");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Number of units (may be negative).
    pub length: i32,
    /// The unit.
    pub unit: TimeUnit,
}

impl Period {
    /// Creates a new period.
    #[must_use]
    pub const fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// A period of `n` days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, TimeUnit::Days)
    }

    /// A period of `n` weeks.
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(n, TimeUnit::Weeks)
    }

    /// A period of `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// A period of `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// Returns the same period with its sign flipped.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self::new(-self.length, self.unit)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.unit.suffix())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .ok_or_else(|| CoreError::invalid_period("empty string"))?;
        let (digits, suffix) = s.split_at(split);

        let unit = match suffix.to_ascii_uppercase().as_str() {
            "D" => TimeUnit::Days,
            "W" => TimeUnit::Weeks,
            "M" => TimeUnit::Months,
            "Y" => TimeUnit::Years,
            other => {
                return Err(CoreError::invalid_period(format!(
                    "unknown unit '{other}' in '{s}'"
                )))
            }
        };
        let length = digits
            .parse::<i32>()
            .map_err(|_| CoreError::invalid_period(format!("bad length in '{s}'")))?;

        Ok(Self::new(length, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("2D".parse::<Period>().unwrap(), Period::days(2));
        assert_eq!("1w".parse::<Period>().unwrap(), Period::weeks(1));
        assert_eq!("30Y".parse::<Period>().unwrap(), Period::years(30));
        assert_eq!("-3M".parse::<Period>().unwrap(), Period::months(-3));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Period>().is_err());
        assert!("M".parse::<Period>().is_err());
        assert!("3Q".parse::<Period>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Period::years(10).to_string(), "10Y");
        assert_eq!(Period::months(6).negate().to_string(), "-6M");
    }
}
