//! Fee ledger error types.
//!
//! Every variant is a deterministic failure scoped to one operation on one
//! student. None of them is retried.

use feeroll_shared::AppError;
use feeroll_shared::types::StudentId;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::calendar::BillingPeriod;
use crate::store::StoreError;

/// Errors that can occur during fee ledger operations.
#[derive(Debug, Error)]
pub enum FeeError {
    // ========== Validation Errors ==========
    /// Payment amount must be greater than zero.
    #[error("Payment amount must be greater than 0, got {0}")]
    InvalidAmount(Decimal),

    /// Monthly fee cannot be negative.
    #[error("Monthly fee cannot be negative, got {0}")]
    InvalidFee(Decimal),

    /// A required payment field was not supplied.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Month text did not name a calendar month.
    #[error("Unknown month: {0}")]
    InvalidMonth(String),

    /// Year outside the supported range.
    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    /// Payment mode text did not name a supported mode.
    #[error("Unknown payment mode: {0}")]
    InvalidPaymentMode(String),

    // ========== Ledger State Errors ==========
    /// A payment is already recorded for this period.
    #[error("Payment for {0} already exists")]
    DuplicatePeriod(BillingPeriod),

    /// Referenced student does not exist.
    #[error("Student not found: {0}")]
    NotFound(StudentId),

    // ========== Store Errors ==========
    /// Record store failure other than not-found or duplicate period.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for FeeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::DuplicatePeriod { period, .. } => Self::DuplicatePeriod(period),
            other => Self::Store(other),
        }
    }
}

impl From<FeeError> for AppError {
    fn from(err: FeeError) -> Self {
        let message = err.to_string();
        match err {
            FeeError::DuplicatePeriod(_) => Self::Conflict(message),
            FeeError::NotFound(_) => Self::NotFound(message),
            FeeError::Store(StoreError::Conflict(_)) => Self::Conflict(message),
            FeeError::Store(_) => Self::Database(message),
            _ => Self::Validation(message),
        }
    }
}
