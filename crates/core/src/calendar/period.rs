//! Monthly billing periods.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::month::Month;

/// A single (month, year) billing unit.
///
/// At most one payment may be recorded per period for a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    /// Calendar month.
    pub month: Month,
    /// Calendar year.
    pub year: i32,
}

impl BillingPeriod {
    /// Creates a billing period.
    #[must_use]
    pub const fn new(month: Month, year: i32) -> Self {
        Self { month, year }
    }

    /// The period containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        let month = Month::from_number(date.month()).unwrap_or(Month::January);
        Self::new(month, date.year())
    }

    /// Months elapsed since January of year 0. Consecutive periods differ by one.
    #[must_use]
    pub fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month.number()) - 1
    }

    /// Number of whole months from `self` to `later`. Negative if `later` is earlier.
    #[must_use]
    pub fn months_until(self, later: Self) -> i64 {
        later.ordinal() - self.ordinal()
    }

    /// The following period.
    #[must_use]
    pub fn next(self) -> Self {
        match self.month {
            Month::December => Self::new(Month::January, self.year + 1),
            month => Self::new(month.succ(), self.year),
        }
    }
}

impl Ord for BillingPeriod {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl PartialOrd for BillingPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}
