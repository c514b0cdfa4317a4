//! Record store abstraction.
//!
//! The fee ledger is pure computation; a [`FeeRecordStore`] supplies student
//! records and persists the updates the ledger produces. The store, not the
//! ledger, is the authority on "one payment per (student, month, year)":
//! [`FeeRecordStore::insert_payment`] must check and insert atomically.

mod error;

pub use error::StoreError;

use std::sync::Arc;

use feeroll_shared::types::StudentId;

use crate::fees::{FeeSchedule, Payment, StudentFeeRecord, StudentStatus};

/// Selection criteria for listing students.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Only students in this class.
    pub class_name: Option<String>,
    /// Only students with this status.
    pub status: Option<StudentStatus>,
}

impl StudentFilter {
    /// Active students, optionally restricted to one class.
    #[must_use]
    pub fn active(class_name: Option<String>) -> Self {
        Self {
            class_name,
            status: Some(StudentStatus::Active),
        }
    }

    /// Returns true if `record` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, record: &StudentFeeRecord) -> bool {
        self.class_name
            .as_deref()
            .is_none_or(|class| record.class_name == class)
            && self.status.is_none_or(|status| record.schedule.status == status)
    }
}

/// Persistence for student fee records.
pub trait FeeRecordStore: Send + Sync {
    /// Loads one student's record.
    fn get(&self, id: StudentId) -> Result<StudentFeeRecord, StoreError>;

    /// Lists records matching `filter`, ordered by student code.
    fn list(&self, filter: &StudentFilter) -> Result<Vec<StudentFeeRecord>, StoreError>;

    /// Adds a new student. Fails with `Conflict` on a duplicate id or student code.
    fn insert_student(&self, record: StudentFeeRecord) -> Result<(), StoreError>;

    /// Appends a payment, rejecting it with `DuplicatePeriod` if the student
    /// already has one for the same period. Check and insert are atomic.
    ///
    /// Returns the record as committed.
    fn insert_payment(
        &self,
        id: StudentId,
        payment: Payment,
    ) -> Result<StudentFeeRecord, StoreError>;

    /// Replaces a student's fee schedule. Returns the record as committed.
    fn update_schedule(
        &self,
        id: StudentId,
        schedule: FeeSchedule,
    ) -> Result<StudentFeeRecord, StoreError>;

    /// Removes a student together with all payments.
    fn remove_student(&self, id: StudentId) -> Result<StudentFeeRecord, StoreError>;
}

impl<T: FeeRecordStore + ?Sized> FeeRecordStore for Arc<T> {
    fn get(&self, id: StudentId) -> Result<StudentFeeRecord, StoreError> {
        (**self).get(id)
    }

    fn list(&self, filter: &StudentFilter) -> Result<Vec<StudentFeeRecord>, StoreError> {
        (**self).list(filter)
    }

    fn insert_student(&self, record: StudentFeeRecord) -> Result<(), StoreError> {
        (**self).insert_student(record)
    }

    fn insert_payment(
        &self,
        id: StudentId,
        payment: Payment,
    ) -> Result<StudentFeeRecord, StoreError> {
        (**self).insert_payment(id, payment)
    }

    fn update_schedule(
        &self,
        id: StudentId,
        schedule: FeeSchedule,
    ) -> Result<StudentFeeRecord, StoreError> {
        (**self).update_schedule(id, schedule)
    }

    fn remove_student(&self, id: StudentId) -> Result<StudentFeeRecord, StoreError> {
        (**self).remove_student(id)
    }
}
