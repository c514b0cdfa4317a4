//! Request-scoped fee ledger service over a record store.

use chrono::NaiveDate;
use feeroll_shared::config::LedgerConfig;
use feeroll_shared::types::{Currency, StudentId};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::balance::{BalanceSummary, StatementLine};
use super::error::FeeError;
use super::ledger::FeeLedger;
use super::receipt::ReceiptGenerator;
use super::types::{PaymentInput, PaymentView, PeriodStatus, RecordedPayment, StudentFeeRecord};
use crate::calendar::{BillingPeriod, Month};
use crate::clock::Clock;
use crate::reports::{CollectionReport, DueSummaryReport, ReportService};
use crate::store::{FeeRecordStore, StudentFilter};

/// Fee ledger operations for the request-handling layer.
///
/// Loads records from the store, applies [`FeeLedger`] logic and persists
/// the result. Each call works on one student and runs to completion.
pub struct FeeLedgerService<S, C> {
    store: S,
    clock: C,
    receipts: ReceiptGenerator,
    currency: Currency,
}

impl<S: FeeRecordStore, C: Clock> FeeLedgerService<S, C> {
    /// Creates a service with default receipt prefix and currency.
    pub fn new(store: S, clock: C) -> Self {
        Self::with_config(store, clock, &LedgerConfig::default())
    }

    /// Creates a service from ledger configuration.
    pub fn with_config(store: S, clock: C, config: &LedgerConfig) -> Self {
        Self {
            store,
            clock,
            receipts: ReceiptGenerator::new(config.receipt_prefix.clone()),
            currency: config.currency,
        }
    }

    /// The underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Current balance of a student.
    pub fn get_balance(&self, id: StudentId) -> Result<BalanceSummary, FeeError> {
        let record = self.store.get(id)?;
        Ok(FeeLedger::balance(&record, self.today()))
    }

    /// Payment status of one period for a student.
    pub fn get_period_status(
        &self,
        id: StudentId,
        month: Month,
        year: i32,
    ) -> Result<PeriodStatus, FeeError> {
        let record = self.store.get(id)?;
        Ok(FeeLedger::status_for_period(
            BillingPeriod::new(month, year),
            &record.payments,
            record.schedule.monthly_fee,
        ))
    }

    /// Records a payment for a student.
    ///
    /// 1. Loads the record (`NotFound` if missing)
    /// 2. Rejects an already-paid period (`DuplicatePeriod`)
    /// 3. Generates a receipt number
    /// 4. Inserts through the store, which re-checks the period atomically
    /// 5. Returns the payment with the balance of the committed record
    pub fn record_payment(
        &self,
        id: StudentId,
        input: PaymentInput,
    ) -> Result<RecordedPayment, FeeError> {
        let record = self.store.get(id)?;
        let paid_at = self.clock.now();
        let receipt = self.receipts.generate(paid_at);

        let payment = FeeLedger::prepare_payment(&record, input, receipt, paid_at)
            .inspect_err(|err| warn!(student_id = %id, error = %err, "Payment rejected"))?;

        let committed = self
            .store
            .insert_payment(id, payment.clone())
            .map_err(FeeError::from)
            .inspect_err(|err| warn!(student_id = %id, error = %err, "Payment insert failed"))?;

        info!(
            student_id = %id,
            period = %payment.period,
            amount = %payment.amount,
            receipt_number = %payment.receipt_number,
            payment_mode = %payment.payment_mode,
            "Monthly payment recorded"
        );

        Ok(FeeLedger::recorded(&committed, payment, self.today()))
    }

    /// Changes a student's monthly fee and returns the new balance.
    pub fn update_monthly_fee(
        &self,
        id: StudentId,
        monthly_fee: Decimal,
    ) -> Result<BalanceSummary, FeeError> {
        let mut record = self.store.get(id)?;
        let previous = record.schedule.monthly_fee;
        FeeLedger::update_monthly_fee(&mut record, monthly_fee)?;

        let committed = self.store.update_schedule(id, record.schedule)?;
        info!(
            student_id = %id,
            previous_fee = %previous,
            monthly_fee = %monthly_fee,
            "Monthly fee updated"
        );
        Ok(FeeLedger::balance(&committed, self.today()))
    }

    /// Marks a student inactive from today; accrual stops.
    pub fn deactivate(&self, id: StudentId) -> Result<BalanceSummary, FeeError> {
        let mut record = self.store.get(id)?;
        let today = self.today();
        FeeLedger::deactivate(&mut record, today);
        let committed = self.store.update_schedule(id, record.schedule)?;
        info!(student_id = %id, deactivated_on = %today, "Student deactivated");
        Ok(FeeLedger::balance(&committed, today))
    }

    /// Marks a student active again.
    pub fn reactivate(&self, id: StudentId) -> Result<BalanceSummary, FeeError> {
        let mut record = self.store.get(id)?;
        FeeLedger::reactivate(&mut record);
        let committed = self.store.update_schedule(id, record.schedule)?;
        info!(student_id = %id, "Student reactivated");
        Ok(FeeLedger::balance(&committed, self.today()))
    }

    /// A student's payments with derived status, most recent first.
    pub fn payment_history(&self, id: StudentId) -> Result<Vec<PaymentView>, FeeError> {
        let record = self.store.get(id)?;
        Ok(FeeLedger::payment_history(&record))
    }

    /// Looks up one of a student's payments by receipt number.
    pub fn find_by_receipt(
        &self,
        id: StudentId,
        receipt: &str,
    ) -> Result<Option<PaymentView>, FeeError> {
        let record = self.store.get(id)?;
        Ok(FeeLedger::find_by_receipt(&record, receipt))
    }

    /// Month-by-month statement for a student.
    pub fn statement(&self, id: StudentId) -> Result<Vec<StatementLine>, FeeError> {
        let record = self.store.get(id)?;
        Ok(FeeLedger::statement(&record, self.today()))
    }

    /// Due/overpaid summary over active students, optionally one class.
    pub fn due_summary(&self, class_name: Option<String>) -> Result<DueSummaryReport, FeeError> {
        let records: Vec<StudentFeeRecord> = self.store.list(&StudentFilter::active(class_name))?;
        Ok(ReportService::due_summary(&records, self.today(), self.currency))
    }

    /// Fee collection per month and quarter of `year`, over all students.
    pub fn collection_report(&self, year: i32) -> Result<CollectionReport, FeeError> {
        let records = self.store.list(&StudentFilter::default())?;
        Ok(ReportService::collection(&records, year, self.currency))
    }
}
