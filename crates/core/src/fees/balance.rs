//! Due/overpaid balance calculations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::accrual::{Obligation, owed_periods};
use super::types::StudentFeeRecord;
use crate::calendar::BillingPeriod;

/// Direction of a lifetime balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceStatus {
    /// Obligation exceeds payments.
    Due,
    /// Payments exceed obligation.
    Overpaid,
    /// Obligation equals payments.
    UpToDate,
}

/// Signed lifetime balance: positive is due, negative is overpaid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// `total_obligation - total_paid`.
    pub amount: Decimal,
    /// Direction of `amount`.
    pub status: BalanceStatus,
}

/// Balance between what has accrued and what has been paid.
#[must_use]
pub fn compute_balance(total_obligation: Decimal, total_paid: Decimal) -> Balance {
    let amount = total_obligation.saturating_sub(total_paid);
    let status = match amount.cmp(&Decimal::ZERO) {
        std::cmp::Ordering::Greater => BalanceStatus::Due,
        std::cmp::Ordering::Less => BalanceStatus::Overpaid,
        std::cmp::Ordering::Equal => BalanceStatus::UpToDate,
    };
    Balance { amount, status }
}

/// Everything a caller needs to display a student's fee position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    /// Date the balance was evaluated at.
    pub as_of: NaiveDate,
    /// Monthly fee in force.
    pub monthly_fee: Decimal,
    /// Months owed so far.
    pub owed_months: u32,
    /// Accrued obligation.
    pub total_obligation: Decimal,
    /// Sum of all payments.
    pub total_paid: Decimal,
    /// Signed balance, positive when due.
    pub balance: Decimal,
    /// Direction of `balance`.
    pub status: BalanceStatus,
}

impl BalanceSummary {
    /// Combines an obligation with the amount paid.
    #[must_use]
    pub fn new(as_of: NaiveDate, obligation: Obligation, total_paid: Decimal) -> Self {
        let Balance { amount, status } = compute_balance(obligation.total_obligation, total_paid);
        Self {
            as_of,
            monthly_fee: obligation.monthly_fee,
            owed_months: obligation.owed_months,
            total_obligation: obligation.total_obligation,
            total_paid,
            balance: amount,
            status,
        }
    }

    /// Amount still due, zero if up to date or overpaid.
    #[must_use]
    pub fn due_amount(&self) -> Decimal {
        self.balance.max(Decimal::ZERO)
    }

    /// Amount overpaid, zero if up to date or due.
    #[must_use]
    pub fn overpaid_amount(&self) -> Decimal {
        (-self.balance).max(Decimal::ZERO)
    }
}

/// One month of a running fee statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    /// The month.
    pub period: BillingPeriod,
    /// Fee charged for the month, zero if not yet owed.
    pub charged: Decimal,
    /// Amount paid against the month.
    pub paid: Decimal,
    /// Balance before this month.
    pub previous_balance: Decimal,
    /// Balance after this month.
    pub running_balance: Decimal,
}

/// Month-by-month statement of charges and payments, oldest first.
///
/// Covers every owed month plus any month paid in advance. The final
/// `running_balance` equals the lifetime balance as of `accrual_date`.
#[must_use]
pub fn statement(record: &StudentFeeRecord, accrual_date: NaiveDate) -> Vec<StatementLine> {
    let fee = record.schedule.monthly_fee;
    let owed = owed_periods(record.schedule.enrollment_date, accrual_date);

    let mut periods: Vec<BillingPeriod> = owed
        .iter()
        .copied()
        .chain(record.payments.iter().map(|p| p.period))
        .collect();
    periods.sort_unstable();
    periods.dedup();

    let mut running = Decimal::ZERO;
    periods
        .into_iter()
        .map(|period| {
            let charged = if owed.binary_search(&period).is_ok() {
                fee
            } else {
                Decimal::ZERO
            };
            let paid = record.payment_for(period).map_or(Decimal::ZERO, |p| p.amount);
            let previous_balance = running;
            running = previous_balance.saturating_add(charged).saturating_sub(paid);
            StatementLine {
                period,
                charged,
                paid,
                previous_balance,
                running_balance: running,
            }
        })
        .collect()
}
