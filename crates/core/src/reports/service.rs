//! Report calculations over student fee records.

use chrono::NaiveDate;
use feeroll_shared::types::Currency;
use rust_decimal::Decimal;

use super::types::{
    CollectionReport, DueSummaryReport, DueSummaryRow, MonthlyCollection, QuarterlyCollection,
};
use crate::calendar::Month;
use crate::fees::{BalanceStatus, FeeLedger, StudentFeeRecord};

const QUARTER_LABELS: [&str; 4] = [
    "Q1 (Jan-Mar)",
    "Q2 (Apr-Jun)",
    "Q3 (Jul-Sep)",
    "Q4 (Oct-Dec)",
];

/// Report service for cross-student summaries.
pub struct ReportService;

impl ReportService {
    /// Due/overpaid summary of `records` as of `as_of`.
    ///
    /// Balances are the ledger's accrued balances. Filtering (active students,
    /// class) is the caller's concern.
    #[must_use]
    pub fn due_summary(
        records: &[StudentFeeRecord],
        as_of: NaiveDate,
        currency: Currency,
    ) -> DueSummaryReport {
        let mut report = DueSummaryReport {
            as_of,
            currency,
            total_students: records.len(),
            students_with_dues: 0,
            students_with_overpayment: 0,
            total_due_amount: Decimal::ZERO,
            total_overpaid_amount: Decimal::ZERO,
            details: Vec::new(),
        };

        for record in records {
            let summary = FeeLedger::balance(record, as_of);
            match summary.status {
                BalanceStatus::Due => {
                    report.students_with_dues += 1;
                    report.total_due_amount =
                        report.total_due_amount.saturating_add(summary.due_amount());
                }
                BalanceStatus::Overpaid => {
                    report.students_with_overpayment += 1;
                    report.total_overpaid_amount =
                        report.total_overpaid_amount.saturating_add(summary.overpaid_amount());
                }
                BalanceStatus::UpToDate => continue,
            }

            report.details.push(DueSummaryRow {
                student_id: record.id,
                student_code: record.student_code.clone(),
                full_name: record.full_name.clone(),
                class_name: record.class_name.clone(),
                monthly_fee: summary.monthly_fee,
                total_obligation: summary.total_obligation,
                total_paid: summary.total_paid,
                balance: summary.balance,
                status: summary.status,
            });
        }

        report.details.sort_by(|a, b| {
            b.balance
                .cmp(&a.balance)
                .then_with(|| a.student_code.cmp(&b.student_code))
        });
        report
    }

    /// Amount collected against each month and quarter of `year`.
    ///
    /// Payments count towards the period they settle, not the day they were
    /// made.
    #[must_use]
    pub fn collection(records: &[StudentFeeRecord], year: i32, currency: Currency) -> CollectionReport {
        let mut months: Vec<MonthlyCollection> = Month::ALL
            .into_iter()
            .map(|month| MonthlyCollection {
                month,
                amount: Decimal::ZERO,
                payment_count: 0,
            })
            .collect();

        for payment in records
            .iter()
            .flat_map(|r| r.payments.iter())
            .filter(|p| p.period.year == year)
        {
            let row = &mut months[payment.period.month.number() as usize - 1];
            row.amount = row.amount.saturating_add(payment.amount);
            row.payment_count += 1;
        }

        let quarters: Vec<QuarterlyCollection> = (1..=4u32)
            .zip(QUARTER_LABELS)
            .map(|(quarter, label)| {
                let rows = months.iter().filter(|m| m.month.quarter() == quarter);
                QuarterlyCollection {
                    quarter,
                    label: label.to_string(),
                    amount: rows.clone().fold(Decimal::ZERO, |t, m| t.saturating_add(m.amount)),
                    payment_count: rows.map(|m| m.payment_count).sum(),
                }
            })
            .collect();

        CollectionReport {
            year,
            currency,
            total_amount: months.iter().fold(Decimal::ZERO, |t, m| t.saturating_add(m.amount)),
            payment_count: months.iter().map(|m| m.payment_count).sum(),
            months,
            quarters,
        }
    }
}
