//! Monthly accrual policy.
//!
//! Obligation accrues once per calendar month, starting with the month that
//! contains the enrollment date. Months before the current one are owed in
//! full. The current month is owed only once the 1st has passed: a fee due
//! "on the 1st" is not in arrears until the 2nd. No proration is applied to
//! a partial first month.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::BillingPeriod;

/// Accrued obligation at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obligation {
    /// Number of months owed.
    pub owed_months: u32,
    /// Fee charged per owed month.
    pub monthly_fee: Decimal,
    /// `owed_months * monthly_fee`.
    pub total_obligation: Decimal,
}

/// Number of months owed from `enrollment_date` up to and including `as_of`.
#[must_use]
pub fn owed_months(enrollment_date: NaiveDate, as_of: NaiveDate) -> u32 {
    let first = BillingPeriod::containing(enrollment_date);
    let current = BillingPeriod::containing(as_of);

    let elapsed = first.months_until(current);
    if elapsed < 0 {
        return 0;
    }

    let current_month_owed = i64::from(as_of.day() > 1);
    u32::try_from(elapsed + current_month_owed).unwrap_or(u32::MAX)
}

/// The owed periods in chronological order.
#[must_use]
pub fn owed_periods(enrollment_date: NaiveDate, as_of: NaiveDate) -> Vec<BillingPeriod> {
    let count = owed_months(enrollment_date, as_of);
    std::iter::successors(Some(BillingPeriod::containing(enrollment_date)), |p| {
        Some(p.next())
    })
    .take(count as usize)
    .collect()
}

/// Total obligation accrued by `as_of` for a fixed monthly fee.
///
/// Saturates at `Decimal::MAX`; fees accepted by the ledger never get there.
#[must_use]
pub fn compute_accrued_obligation(
    enrollment_date: NaiveDate,
    as_of: NaiveDate,
    monthly_fee: Decimal,
) -> Obligation {
    let owed_months = owed_months(enrollment_date, as_of);
    Obligation {
        owed_months,
        monthly_fee,
        total_obligation: Decimal::from(owed_months).saturating_mul(monthly_fee),
    }
}
