//! Racing writers on the same student and period.

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::NaiveDate;
use feeroll_core::calendar::{BillingPeriod, Month};
use feeroll_core::fees::{FeeError, FeeLedgerService, FeeSchedule, PaymentInput, PaymentMode, StudentFeeRecord};
use feeroll_core::store::FeeRecordStore;
use feeroll_core::FixedClock;
use feeroll_store::InMemoryStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const WRITERS: usize = 16;

fn setup() -> (FeeLedgerService<Arc<InMemoryStore>, FixedClock>, StudentFeeRecord) {
    let enrolled = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let record = StudentFeeRecord::new(
        "S-1",
        "Meera Iyer",
        "Grade 9",
        FeeSchedule::new(dec!(1000), enrolled),
    );
    let store = Arc::new(InMemoryStore::new());
    store.insert_student(record.clone()).unwrap();
    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    (FeeLedgerService::new(store, clock), record)
}

#[test]
fn test_exactly_one_writer_wins_a_period() {
    let (service, record) = setup();
    let barrier = Barrier::new(WRITERS);

    let results: Vec<Result<_, FeeError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let service = &service;
                let barrier = &barrier;
                scope.spawn(move || {
                    let amount = Decimal::from(900 + i64::try_from(i).unwrap());
                    let input = PaymentInput::new(
                        BillingPeriod::new(Month::February, 2024),
                        amount,
                        PaymentMode::Cash,
                        None,
                    )
                    .unwrap();
                    barrier.wait();
                    service.record_payment(record.id, input)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|err| matches!(err, FeeError::DuplicatePeriod(_)))
    );

    let stored = service.store().get(record.id).unwrap();
    assert_eq!(stored.payments.len(), 1);
    assert_eq!(stored.total_paid(), stored.payments[0].amount);
}

#[test]
fn test_distinct_periods_all_succeed() {
    let (service, record) = setup();
    let barrier = Barrier::new(Month::ALL.len());

    thread::scope(|scope| {
        for month in Month::ALL {
            let service = &service;
            let barrier = &barrier;
            scope.spawn(move || {
                let input = PaymentInput::new(
                    BillingPeriod::new(month, 2024),
                    dec!(1000),
                    PaymentMode::Online,
                    None,
                )
                .unwrap();
                barrier.wait();
                service.record_payment(record.id, input).unwrap();
            });
        }
    });

    let stored = service.store().get(record.id).unwrap();
    assert_eq!(stored.payments.len(), 12);
    assert_eq!(stored.total_paid(), dec!(12000));
}
