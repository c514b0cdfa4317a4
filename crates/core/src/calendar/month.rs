//! Calendar month names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the twelve calendar months.
///
/// Serialized by full English name (`"January"`), which is the form payment
/// records carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    /// January
    January,
    /// February
    February,
    /// March
    March,
    /// April
    April,
    /// May
    May,
    /// June
    June,
    /// July
    July,
    /// August
    August,
    /// September
    September,
    /// October
    October,
    /// November
    November,
    /// December
    December,
}

/// Month text did not name a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown month: {0}")]
pub struct ParseMonthError(pub String);

impl Month {
    /// All months in calendar order.
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Month number, 1 (January) to 12 (December).
    #[must_use]
    pub const fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Month for a 1-based number. `None` outside 1..=12.
    #[must_use]
    pub fn from_number(number: u32) -> Option<Self> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        Self::ALL.get(index).copied()
    }

    /// Full English name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    /// Calendar quarter, 1 to 4.
    #[must_use]
    pub const fn quarter(self) -> u32 {
        (self.number() - 1) / 3 + 1
    }

    /// The following month, wrapping December to January.
    #[must_use]
    pub fn succ(self) -> Self {
        Self::ALL[(self as usize + 1) % 12]
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Month {
    type Err = ParseMonthError;

    /// Accepts full names and three-letter abbreviations, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|month| {
                let name = month.name().to_lowercase();
                name == needle || (needle.len() == 3 && name.starts_with(&needle))
            })
            .ok_or_else(|| ParseMonthError(s.to_string()))
    }
}
