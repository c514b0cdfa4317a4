//! Student fee ledger.
//!
//! This module implements the fee accrual and payment ledger:
//! - Monthly accrual with the past-the-1st rule
//! - Due/overpaid balance and month-by-month statements
//! - Per-period payment status, derived on read
//! - Payment validation and recording (one payment per month and year)
//! - Receipt number generation
//! - Ledger service over a record store

pub mod accrual;
pub mod balance;
pub mod error;
pub mod ledger;
pub mod receipt;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use accrual::{Obligation, compute_accrued_obligation, owed_months, owed_periods};
pub use balance::{Balance, BalanceStatus, BalanceSummary, StatementLine, compute_balance};
pub use error::FeeError;
pub use ledger::FeeLedger;
pub use receipt::ReceiptGenerator;
pub use service::FeeLedgerService;
pub use types::{
    FeeSchedule, MAX_AMOUNT, Payment, PaymentInput, PaymentMode, PaymentRequest, PaymentStatus,
    PaymentView, PeriodStatus, ReceiptNumber, RecordedPayment, StudentFeeRecord, StudentStatus,
};
