//! Report types.

use chrono::NaiveDate;
use feeroll_shared::types::{Currency, StudentId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calendar::Month;
use crate::fees::BalanceStatus;

/// One student with a non-zero balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueSummaryRow {
    /// Student identifier.
    pub student_id: StudentId,
    /// Admission number.
    pub student_code: String,
    /// Full name.
    pub full_name: String,
    /// Class.
    pub class_name: String,
    /// Monthly fee in force.
    pub monthly_fee: Decimal,
    /// Accrued obligation.
    pub total_obligation: Decimal,
    /// Sum of payments.
    pub total_paid: Decimal,
    /// Signed balance, positive when due.
    pub balance: Decimal,
    /// `Due` or `Overpaid`.
    pub status: BalanceStatus,
}

/// Due/overpaid summary over a set of students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueSummaryReport {
    /// Date balances were evaluated at.
    pub as_of: NaiveDate,
    /// Currency of all amounts.
    pub currency: Currency,
    /// Students considered.
    pub total_students: usize,
    /// Students with a positive balance.
    pub students_with_dues: usize,
    /// Students with a negative balance.
    pub students_with_overpayment: usize,
    /// Sum of positive balances.
    pub total_due_amount: Decimal,
    /// Sum of overpaid amounts, as a positive number.
    pub total_overpaid_amount: Decimal,
    /// Students with a non-zero balance, largest due first.
    pub details: Vec<DueSummaryRow>,
}

/// Collection for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCollection {
    /// The month.
    pub month: Month,
    /// Amount collected against the month.
    pub amount: Decimal,
    /// Number of payments.
    pub payment_count: usize,
}

/// Collection for one calendar quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyCollection {
    /// Quarter number, 1 to 4.
    pub quarter: u32,
    /// Display label, e.g. "Q1 (Jan-Mar)".
    pub label: String,
    /// Amount collected.
    pub amount: Decimal,
    /// Number of payments.
    pub payment_count: usize,
}

/// Fee collection for one year, by billing period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport {
    /// Year reported.
    pub year: i32,
    /// Currency of all amounts.
    pub currency: Currency,
    /// Twelve rows, January first.
    pub months: Vec<MonthlyCollection>,
    /// Four rows, Q1 first.
    pub quarters: Vec<QuarterlyCollection>,
    /// Total collected in the year.
    pub total_amount: Decimal,
    /// Total number of payments.
    pub payment_count: usize,
}
