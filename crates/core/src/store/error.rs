//! Record store errors.

use feeroll_shared::types::StudentId;
use thiserror::Error;

use crate::calendar::BillingPeriod;

/// Errors raised by a [`FeeRecordStore`](super::FeeRecordStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// No student with this id.
    #[error("Student not found: {0}")]
    NotFound(StudentId),

    /// The student already has a payment for this period.
    #[error("Payment for {period} already exists for student {student_id}")]
    DuplicatePeriod {
        /// Student the payment was for.
        student_id: StudentId,
        /// Period already paid.
        period: BillingPeriod,
    },

    /// Uniqueness violation other than a duplicate period.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}
