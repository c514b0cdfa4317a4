//! Pure fee ledger operations over a single student's record.
//!
//! Nothing here touches storage. Callers load a [`StudentFeeRecord`], apply
//! an operation and persist the result.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use super::accrual::compute_accrued_obligation;
use super::balance::{BalanceSummary, StatementLine, statement};
use super::error::FeeError;
use super::types::{
    MAX_AMOUNT, Payment, PaymentInput, PaymentStatus, PaymentView, PeriodStatus, ReceiptNumber,
    RecordedPayment, StudentFeeRecord, StudentStatus,
};
use crate::calendar::BillingPeriod;

/// Fee ledger for accrual, balance and payment validation.
///
/// This type contains pure business logic with no storage dependencies.
pub struct FeeLedger;

impl FeeLedger {
    /// Lifetime balance of `record` as of `as_of`.
    ///
    /// Inactive students are evaluated at their deactivation date; see
    /// [`FeeSchedule::accrual_date`](super::FeeSchedule::accrual_date).
    #[must_use]
    pub fn balance(record: &StudentFeeRecord, as_of: NaiveDate) -> BalanceSummary {
        let schedule = &record.schedule;
        let obligation = compute_accrued_obligation(
            schedule.enrollment_date,
            schedule.accrual_date(as_of),
            schedule.monthly_fee,
        );
        BalanceSummary::new(as_of, obligation, record.total_paid())
    }

    /// Payment status of one period.
    #[must_use]
    pub fn status_for_period(
        period: BillingPeriod,
        payments: &[Payment],
        monthly_fee: Decimal,
    ) -> PeriodStatus {
        match payments.iter().find(|p| p.period == period) {
            None => PeriodStatus {
                period,
                status: PaymentStatus::Unpaid,
                amount: Decimal::ZERO,
            },
            Some(payment) => PeriodStatus {
                period,
                status: payment.status_against(monthly_fee),
                amount: payment.amount,
            },
        }
    }

    /// Fails with `DuplicatePeriod` if `period` already has a payment.
    ///
    /// This is the fast path. The record store performs the authoritative
    /// check when the payment is inserted.
    pub fn ensure_period_open(
        record: &StudentFeeRecord,
        period: BillingPeriod,
    ) -> Result<(), FeeError> {
        if record.payment_for(period).is_some() {
            return Err(FeeError::DuplicatePeriod(period));
        }
        Ok(())
    }

    /// Validates `input` against `record` and builds the payment to persist.
    ///
    /// `record` is not modified.
    pub fn prepare_payment(
        record: &StudentFeeRecord,
        input: PaymentInput,
        receipt_number: ReceiptNumber,
        paid_at: DateTime<Utc>,
    ) -> Result<Payment, FeeError> {
        Self::ensure_period_open(record, input.period())?;
        Ok(input.into_payment(receipt_number, paid_at))
    }

    /// Result of a payment that is already part of `record`.
    #[must_use]
    pub fn recorded(record: &StudentFeeRecord, payment: Payment, as_of: NaiveDate) -> RecordedPayment {
        let period_status =
            Self::status_for_period(payment.period, &record.payments, record.schedule.monthly_fee);
        RecordedPayment {
            payment,
            period_status,
            balance: Self::balance(record, as_of),
        }
    }

    /// Records a payment on an in-memory record.
    ///
    /// Either the payment list gains exactly one entry or `record` is left
    /// unchanged.
    pub fn record_payment(
        record: &mut StudentFeeRecord,
        input: PaymentInput,
        receipt_number: ReceiptNumber,
        paid_at: DateTime<Utc>,
        as_of: NaiveDate,
    ) -> Result<RecordedPayment, FeeError> {
        let payment = Self::prepare_payment(record, input, receipt_number, paid_at)?;
        record.payments.push(payment.clone());
        debug!(
            student_id = %record.id,
            period = %payment.period,
            amount = %payment.amount,
            "Payment appended"
        );
        Ok(Self::recorded(record, payment, as_of))
    }

    /// Changes the monthly fee. Existing payments are left as recorded.
    ///
    /// The fee must lie in `0..=MAX_AMOUNT`.
    pub fn update_monthly_fee(
        record: &mut StudentFeeRecord,
        monthly_fee: Decimal,
    ) -> Result<(), FeeError> {
        if monthly_fee < Decimal::ZERO || monthly_fee > MAX_AMOUNT {
            return Err(FeeError::InvalidFee(monthly_fee));
        }
        record.schedule.monthly_fee = monthly_fee;
        Ok(())
    }

    /// Marks the student inactive; accrual stops at `on`.
    pub fn deactivate(record: &mut StudentFeeRecord, on: NaiveDate) {
        record.schedule.status = StudentStatus::Inactive;
        record.schedule.deactivated_on = Some(on);
    }

    /// Marks the student active again; accrual resumes as if uninterrupted.
    pub fn reactivate(record: &mut StudentFeeRecord) {
        record.schedule.status = StudentStatus::Active;
        record.schedule.deactivated_on = None;
    }

    /// Payments with their derived status, most recent first.
    #[must_use]
    pub fn payment_history(record: &StudentFeeRecord) -> Vec<PaymentView> {
        let fee = record.schedule.monthly_fee;
        let mut history: Vec<PaymentView> = record
            .payments
            .iter()
            .map(|payment| PaymentView {
                status: payment.status_against(fee),
                payment: payment.clone(),
            })
            .collect();
        history.sort_by(|a, b| {
            b.payment
                .paid_date
                .cmp(&a.payment.paid_date)
                .then_with(|| b.payment.period.cmp(&a.payment.period))
        });
        history
    }

    /// Looks up a payment by receipt number.
    #[must_use]
    pub fn find_by_receipt(record: &StudentFeeRecord, receipt: &str) -> Option<PaymentView> {
        record
            .payments
            .iter()
            .find(|p| p.receipt_number.as_str() == receipt)
            .map(|payment| PaymentView {
                status: payment.status_against(record.schedule.monthly_fee),
                payment: payment.clone(),
            })
    }

    /// Month-by-month statement as of `as_of`.
    #[must_use]
    pub fn statement(record: &StudentFeeRecord, as_of: NaiveDate) -> Vec<StatementLine> {
        statement(record, record.schedule.accrual_date(as_of))
    }
}
