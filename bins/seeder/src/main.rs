//! Seeds demo students and payments into an in-memory store and prints the
//! resulting balances and reports as JSON.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, Months, NaiveDate};
use feeroll_core::SystemClock;
use feeroll_core::calendar::BillingPeriod;
use feeroll_core::clock::Clock;
use feeroll_core::fees::{
    FeeLedgerService, FeeSchedule, PaymentInput, PaymentMode, StudentFeeRecord, owed_periods,
};
use feeroll_core::store::FeeRecordStore;
use feeroll_shared::types::{Money, StudentId};
use feeroll_shared::{AppConfig, AppError};
use feeroll_store::InMemoryStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Demo student: code, name, class, monthly fee, months since enrollment.
struct SeedStudent {
    code: &'static str,
    name: &'static str,
    class: &'static str,
    monthly_fee: Decimal,
    months_enrolled: u32,
    /// Amounts paid for the earliest owed periods, in order.
    payments: &'static [Decimal],
}

const STUDENTS: &[SeedStudent] = &[
    SeedStudent {
        code: "STU-001",
        name: "Aarav Sharma",
        class: "Grade 5",
        monthly_fee: dec!(1500),
        months_enrolled: 4,
        payments: &[dec!(1500), dec!(1500), dec!(1500), dec!(1500), dec!(1500)],
    },
    SeedStudent {
        code: "STU-002",
        name: "Diya Patel",
        class: "Grade 5",
        monthly_fee: dec!(1500),
        months_enrolled: 5,
        payments: &[dec!(1500), dec!(1000)],
    },
    SeedStudent {
        code: "STU-003",
        name: "Kabir Singh",
        class: "Grade 8",
        monthly_fee: dec!(2200),
        months_enrolled: 2,
        payments: &[dec!(2500), dec!(2500), dec!(2500)],
    },
    SeedStudent {
        code: "STU-004",
        name: "Ananya Rao",
        class: "Grade 8",
        monthly_fee: dec!(2200),
        months_enrolled: 0,
        payments: &[],
    },
];

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);

    let clock = SystemClock::new(config.ledger.tz()?);
    let today = clock.today();
    let service = FeeLedgerService::with_config(InMemoryStore::new(), clock, &config.ledger);

    info!(students = STUDENTS.len(), %today, "Seeding students");
    let mut ids = Vec::with_capacity(STUDENTS.len());
    for seed in STUDENTS {
        ids.push(seed_student(&service, seed, today)?);
    }

    // A second payment for an already-paid period is refused.
    if let Some(first) = ids.first() {
        let period = BillingPeriod::containing(today);
        let repeat = PaymentInput::new(period, dec!(1500), PaymentMode::Cash, None)?;
        if let Err(err) = service.record_payment(*first, repeat) {
            let app_err = AppError::from(err);
            warn!(
                status = app_err.status_code(),
                code = app_err.error_code(),
                error = %app_err,
                "Repeat payment refused"
            );
        }
    }

    for id in &ids {
        let balance = service.get_balance(*id)?;
        let amount = Money::new(balance.balance, config.ledger.currency);
        info!(student_id = %id, balance = %amount, status = ?balance.status, "Balance");
        println!("{}", serde_json::to_string_pretty(&balance)?);
    }

    let due = service.due_summary(None)?;
    println!("{}", serde_json::to_string_pretty(&due)?);

    let collection = service.collection_report(today.year())?;
    println!("{}", serde_json::to_string_pretty(&collection)?);

    info!("Seeding complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let json = config.logging.json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .init();
}

fn seed_student<C: Clock>(
    service: &FeeLedgerService<InMemoryStore, C>,
    seed: &SeedStudent,
    today: NaiveDate,
) -> anyhow::Result<StudentId> {
    let enrolled = today
        .checked_sub_months(Months::new(seed.months_enrolled))
        .context("enrollment date out of range")?;
    let record = StudentFeeRecord::new(
        seed.code,
        seed.name,
        seed.class,
        FeeSchedule::new(seed.monthly_fee, enrolled),
    );
    let id = record.id;
    service.store().insert_student(record)?;

    // Payments settle the earliest periods first; extra payments prepay ahead.
    let owed = owed_periods(enrolled, today);
    let mut period = BillingPeriod::containing(enrolled);
    for (i, amount) in seed.payments.iter().enumerate() {
        let mode = if i % 2 == 0 { PaymentMode::Cash } else { PaymentMode::Online };
        let input = PaymentInput::new(period, *amount, mode, None)?;
        let recorded = service.record_payment(id, input)?;
        info!(
            student_code = seed.code,
            period = %period,
            receipt_number = %recorded.payment.receipt_number,
            status = ?recorded.period_status.status,
            "Seeded payment"
        );
        period = period.next();
    }
    info!(student_code = seed.code, owed_months = owed.len(), "Student seeded");

    Ok(id)
}
