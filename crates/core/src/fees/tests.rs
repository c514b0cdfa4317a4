//! Property-based and service tests for the fee ledger.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Days, NaiveDate, TimeZone, Utc};
use feeroll_shared::types::StudentId;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::calendar::{BillingPeriod, Month};
use crate::clock::FixedClock;
use crate::store::{FeeRecordStore, StoreError, StudentFilter};

// ============================================================================
// Test store
// ============================================================================

/// Minimal mutex-backed store for exercising the service.
#[derive(Default)]
struct TestStore {
    records: Mutex<HashMap<StudentId, StudentFeeRecord>>,
    /// When set, `get` returns records without payments, as a reader that
    /// raced a concurrent writer would see them.
    stale_reads: bool,
}

impl TestStore {
    fn with(records: impl IntoIterator<Item = StudentFeeRecord>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().map(|r| (r.id, r)).collect()),
            stale_reads: false,
        }
    }
}

impl FeeRecordStore for TestStore {
    fn get(&self, id: StudentId) -> Result<StudentFeeRecord, StoreError> {
        let records = self.records.lock().unwrap();
        let mut record = records.get(&id).cloned().ok_or(StoreError::NotFound(id))?;
        if self.stale_reads {
            record.payments.clear();
        }
        Ok(record)
    }

    fn list(&self, filter: &StudentFilter) -> Result<Vec<StudentFeeRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<_> = records.values().filter(|r| filter.matches(r)).cloned().collect();
        out.sort_by(|a, b| a.student_code.cmp(&b.student_code));
        Ok(out)
    }

    fn insert_student(&self, record: StudentFeeRecord) -> Result<(), StoreError> {
        self.records.lock().unwrap().insert(record.id, record);
        Ok(())
    }

    fn insert_payment(
        &self,
        id: StudentId,
        payment: Payment,
    ) -> Result<StudentFeeRecord, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if record.payment_for(payment.period).is_some() {
            return Err(StoreError::DuplicatePeriod {
                student_id: id,
                period: payment.period,
            });
        }
        record.payments.push(payment);
        Ok(record.clone())
    }

    fn update_schedule(
        &self,
        id: StudentId,
        schedule: FeeSchedule,
    ) -> Result<StudentFeeRecord, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.schedule = schedule;
        Ok(record.clone())
    }

    fn remove_student(&self, id: StudentId) -> Result<StudentFeeRecord, StoreError> {
        self.records
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(StoreError::NotFound(id))
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn student(fee: Decimal, enrolled: NaiveDate) -> StudentFeeRecord {
    StudentFeeRecord::new("S-42", "Priya Shah", "Grade 7", FeeSchedule::new(fee, enrolled))
}

fn payment_input(month: Month, year: i32, amount: Decimal) -> PaymentInput {
    PaymentInput::new(BillingPeriod::new(month, year), amount, PaymentMode::Cash, None).unwrap()
}

// ============================================================================
// Strategies
// ============================================================================

/// Positive amounts from 0.01 to 5,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Non-negative monthly fees from 0 to 5,000.00.
fn monthly_fee() -> impl Strategy<Value = Decimal> {
    (0i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Periods drawn from a narrow window so duplicates are common.
fn period() -> impl Strategy<Value = BillingPeriod> {
    (1u32..=12, 2023i32..=2024).prop_map(|(m, y)| {
        BillingPeriod::new(Month::from_number(m).unwrap_or(Month::January), y)
    })
}

/// Dates between 2020-01-01 and roughly 2029.
fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..3650).prop_map(|offset| date(2020, 1, 1) + Days::new(offset))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// At most one payment per period; a repeat returns DuplicatePeriod and
    /// leaves the list unchanged.
    #[test]
    fn test_no_duplicate_periods(
        attempts in prop::collection::vec((period(), positive_amount()), 1..40),
    ) {
        let mut record = student(dec!(1000), date(2023, 1, 1));
        let paid_at = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

        for (i, (period, amount)) in attempts.into_iter().enumerate() {
            let already_paid = record.payment_for(period).is_some();
            let before = record.payments.clone();
            let input = PaymentInput::new(period, amount, PaymentMode::Cash, None).unwrap();

            let result = FeeLedger::record_payment(
                &mut record,
                input,
                ReceiptNumber(format!("R{i}")),
                paid_at,
                date(2024, 6, 2),
            );

            if already_paid {
                prop_assert!(matches!(result, Err(FeeError::DuplicatePeriod(p)) if p == period));
                prop_assert_eq!(&record.payments, &before);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(record.payments.len(), before.len() + 1);
            }
        }

        let mut periods: Vec<_> = record.payments.iter().map(|p| p.period).collect();
        let total = periods.len();
        periods.sort_unstable();
        periods.dedup();
        prop_assert_eq!(periods.len(), total);
    }

    /// balance == owed months * fee - sum of payments, after every success.
    #[test]
    fn test_balance_consistency(
        fee in monthly_fee(),
        enrolled in any_date(),
        as_of in any_date(),
        attempts in prop::collection::vec((period(), positive_amount()), 0..20),
    ) {
        let mut record = student(fee, enrolled);
        let paid_at = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

        for (i, (period, amount)) in attempts.into_iter().enumerate() {
            let input = PaymentInput::new(period, amount, PaymentMode::Online, None).unwrap();
            if let Ok(recorded) = FeeLedger::record_payment(
                &mut record,
                input,
                ReceiptNumber(format!("R{i}")),
                paid_at,
                as_of,
            ) {
                let paid: Decimal = record.payments.iter().map(|p| p.amount).sum();
                let owed = Decimal::from(owed_months(enrolled, as_of)) * fee;
                prop_assert_eq!(recorded.balance.total_paid, paid);
                prop_assert_eq!(recorded.balance.total_obligation, owed);
                prop_assert_eq!(recorded.balance.balance, owed - paid);
            }
        }
    }

    /// Obligation never decreases as the evaluation date advances.
    #[test]
    fn test_accrual_monotonic(
        fee in monthly_fee(),
        enrolled in any_date(),
        a in any_date(),
        b in any_date(),
    ) {
        let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
        let first = compute_accrued_obligation(enrolled, earlier, fee);
        let second = compute_accrued_obligation(enrolled, later, fee);
        prop_assert!(first.owed_months <= second.owed_months);
        prop_assert!(first.total_obligation <= second.total_obligation);
    }

    /// Consecutive days add at most one owed month.
    #[test]
    fn test_accrual_steps_by_at_most_one(enrolled in any_date(), day in any_date()) {
        let today = owed_months(enrolled, day);
        let tomorrow = owed_months(enrolled, day + Days::new(1));
        prop_assert!(tomorrow - today <= 1);
    }

    /// Any positive payment against a zero fee is Overpaid, and nothing accrues.
    #[test]
    fn test_zero_fee(enrolled in any_date(), as_of in any_date(), amount in positive_amount()) {
        prop_assert_eq!(
            compute_accrued_obligation(enrolled, as_of, Decimal::ZERO).total_obligation,
            Decimal::ZERO
        );
        prop_assert_eq!(PaymentStatus::derive(amount, Decimal::ZERO), PaymentStatus::Overpaid);
    }
}

// ============================================================================
// Service
// ============================================================================

fn service_on(
    day: NaiveDate,
    records: impl IntoIterator<Item = StudentFeeRecord>,
) -> FeeLedgerService<TestStore, FixedClock> {
    FeeLedgerService::new(TestStore::with(records), FixedClock::on(day))
}

#[test]
fn test_first_of_month_rule_through_service() {
    let record = student(dec!(1000), date(2024, 1, 15));
    let id = record.id;

    let on_first = service_on(date(2024, 3, 1), [record.clone()]);
    assert_eq!(on_first.get_balance(id).unwrap().total_obligation, dec!(2000));

    let on_second = service_on(date(2024, 3, 2), [record]);
    assert_eq!(on_second.get_balance(id).unwrap().total_obligation, dec!(3000));
}

#[test]
fn test_record_then_query_period_round_trip() {
    let record = student(dec!(1000), date(2024, 1, 15));
    let id = record.id;
    let service = service_on(date(2024, 3, 2), [record]);

    let recorded = service
        .record_payment(id, payment_input(Month::February, 2024, dec!(800)))
        .unwrap();
    assert!(recorded.payment.receipt_number.as_str().starts_with("RCP"));
    assert_eq!(recorded.balance.total_paid, dec!(800));
    assert_eq!(recorded.balance.balance, dec!(2200));

    let status = service.get_period_status(id, Month::February, 2024).unwrap();
    assert_eq!(status.status, PaymentStatus::Partial);
    assert_eq!(status.amount, dec!(800));

    let unpaid = service.get_period_status(id, Month::March, 2024).unwrap();
    assert_eq!(unpaid.status, PaymentStatus::Unpaid);
}

#[test]
fn test_balance_query_is_idempotent() {
    let record = student(dec!(750), date(2023, 9, 3));
    let id = record.id;
    let service = service_on(date(2024, 2, 14), [record]);
    service
        .record_payment(id, payment_input(Month::September, 2023, dec!(750)))
        .unwrap();

    let first = service.get_balance(id).unwrap();
    let second = service.get_balance(id).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_duplicate_period_through_service() {
    let record = student(dec!(1000), date(2024, 1, 15));
    let id = record.id;
    let service = service_on(date(2024, 3, 2), [record]);

    service
        .record_payment(id, payment_input(Month::January, 2024, dec!(1000)))
        .unwrap();
    let err = service
        .record_payment(id, payment_input(Month::January, 2024, dec!(1000)))
        .unwrap_err();

    assert!(matches!(err, FeeError::DuplicatePeriod(_)));
    assert_eq!(service.payment_history(id).unwrap().len(), 1);
}

#[test]
fn test_store_check_is_authoritative() {
    let record = student(dec!(1000), date(2024, 1, 15));
    let id = record.id;
    let mut store = TestStore::with([record]);
    store.stale_reads = true;
    let service = FeeLedgerService::new(store, FixedClock::on(date(2024, 3, 2)));

    service
        .record_payment(id, payment_input(Month::January, 2024, dec!(1000)))
        .unwrap();
    // The stale read passes the ledger's fast-path check; the store rejects it.
    let err = service
        .record_payment(id, payment_input(Month::January, 2024, dec!(900)))
        .unwrap_err();
    assert!(matches!(err, FeeError::DuplicatePeriod(p) if p.month == Month::January));
}

#[test]
fn test_unknown_student_is_not_found() {
    let service = service_on(date(2024, 3, 2), []);
    let id = StudentId::new();

    assert!(matches!(service.get_balance(id), Err(FeeError::NotFound(found)) if found == id));
    assert!(matches!(
        service.record_payment(id, payment_input(Month::March, 2024, dec!(1))),
        Err(FeeError::NotFound(_))
    ));
    assert!(matches!(
        service.get_period_status(id, Month::March, 2024),
        Err(FeeError::NotFound(_))
    ));
}

#[test]
fn test_fee_update_and_deactivation_through_service() {
    let record = student(dec!(1000), date(2024, 1, 15));
    let id = record.id;
    let service = service_on(date(2024, 3, 2), [record]);

    let balance = service.update_monthly_fee(id, dec!(1100)).unwrap();
    assert_eq!(balance.total_obligation, dec!(3300));
    assert!(matches!(
        service.update_monthly_fee(id, dec!(-1)),
        Err(FeeError::InvalidFee(_))
    ));

    let balance = service.deactivate(id).unwrap();
    assert_eq!(balance.owed_months, 3);
    let stored = service.store().get(id).unwrap();
    assert_eq!(stored.schedule.status, StudentStatus::Inactive);
    assert_eq!(stored.schedule.deactivated_on, Some(date(2024, 3, 2)));

    service.reactivate(id).unwrap();
    assert!(service.store().get(id).unwrap().schedule.is_active());
}

#[test]
fn test_oversized_fee_is_rejected_before_store() {
    let record = student(dec!(1000), date(2024, 1, 15));
    let id = record.id;
    let service = service_on(date(2024, 3, 2), [record]);

    assert!(matches!(
        service.update_monthly_fee(id, Decimal::MAX),
        Err(FeeError::InvalidFee(_))
    ));
    assert_eq!(service.store().get(id).unwrap().schedule.monthly_fee, dec!(1000));
    assert_eq!(service.get_balance(id).unwrap().total_obligation, dec!(3000));
}

#[test]
fn test_reports_through_service() {
    let paying = student(dec!(1000), date(2024, 1, 15));
    let mut inactive = StudentFeeRecord::new(
        "S-43",
        "Arjun Mehta",
        "Grade 7",
        FeeSchedule::new(dec!(1000), date(2024, 1, 15)),
    );
    inactive.schedule.status = StudentStatus::Inactive;
    let id = paying.id;
    let service = service_on(date(2024, 3, 2), [paying, inactive]);

    service
        .record_payment(id, payment_input(Month::January, 2024, dec!(1000)))
        .unwrap();

    let due = service.due_summary(None).unwrap();
    assert_eq!(due.total_students, 1);
    assert_eq!(due.total_due_amount, dec!(2000));

    let other_class = service.due_summary(Some("Grade 1".into())).unwrap();
    assert_eq!(other_class.total_students, 0);

    let collection = service.collection_report(2024).unwrap();
    assert_eq!(collection.total_amount, dec!(1000));
    assert_eq!(collection.months[0].payment_count, 1);
}

#[test]
fn test_statement_and_receipt_lookup_through_service() {
    let record = student(dec!(1000), date(2024, 1, 15));
    let id = record.id;
    let service = service_on(date(2024, 3, 2), [record]);

    let recorded = service
        .record_payment(id, payment_input(Month::January, 2024, dec!(1000)))
        .unwrap();

    let lines = service.statement(id).unwrap();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2].running_balance, dec!(2000));

    let found = service
        .find_by_receipt(id, recorded.payment.receipt_number.as_str())
        .unwrap()
        .unwrap();
    assert_eq!(found.status, PaymentStatus::Paid);
}
