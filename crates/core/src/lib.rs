//! Core fee ledger logic for Feeroll.
//!
//! This crate contains pure business logic with ZERO storage or transport dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `calendar` - Calendar months and monthly billing periods
//! - `clock` - Time source abstraction
//! - `fees` - Fee accrual, balances, and payment recording
//! - `reports` - Due summary and collection reports
//! - `store` - Record store abstraction the ledger persists through

pub mod calendar;
pub mod clock;
pub mod fees;
pub mod reports;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
