//! In-memory record store for student fee records.
//!
//! [`InMemoryStore`] implements [`FeeRecordStore`] over a `DashMap` keyed by
//! student id. Writes to one student hold that entry's shard lock for the
//! whole check-and-modify, so two writers racing on the same
//! (student, month, year) cannot both succeed.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use feeroll_core::fees::{FeeSchedule, Payment, StudentFeeRecord};
use feeroll_core::store::{FeeRecordStore, StoreError, StudentFilter};
use feeroll_shared::types::StudentId;
use tracing::{debug, warn};

/// Concurrent in-memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: DashMap<StudentId, StudentFeeRecord>,
    /// Student code to id; claimed before a record is inserted.
    codes: DashMap<String, StudentId>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of students held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no students are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finds a student by their school-assigned code.
    pub fn find_by_code(&self, student_code: &str) -> Option<StudentFeeRecord> {
        let id = *self.codes.get(student_code)?;
        self.records.get(&id).map(|entry| entry.clone())
    }
}

impl FeeRecordStore for InMemoryStore {
    fn get(&self, id: StudentId) -> Result<StudentFeeRecord, StoreError> {
        self.records
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or(StoreError::NotFound(id))
    }

    fn list(&self, filter: &StudentFilter) -> Result<Vec<StudentFeeRecord>, StoreError> {
        let mut records: Vec<StudentFeeRecord> = self
            .records
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| a.student_code.cmp(&b.student_code));
        Ok(records)
    }

    fn insert_student(&self, record: StudentFeeRecord) -> Result<(), StoreError> {
        let id = record.id;
        match self.codes.entry(record.student_code.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Conflict(format!(
                    "student code {} already exists",
                    record.student_code
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        match self.records.entry(id) {
            Entry::Occupied(_) => {
                self.codes.remove(&record.student_code);
                Err(StoreError::Conflict(format!("student {id} already exists")))
            }
            Entry::Vacant(slot) => {
                debug!(student_id = %id, student_code = %record.student_code, "Student inserted");
                slot.insert(record);
                Ok(())
            }
        }
    }

    fn insert_payment(
        &self,
        id: StudentId,
        payment: Payment,
    ) -> Result<StudentFeeRecord, StoreError> {
        let mut entry = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if entry.payment_for(payment.period).is_some() {
            warn!(student_id = %id, period = %payment.period, "Duplicate period rejected by store");
            return Err(StoreError::DuplicatePeriod {
                student_id: id,
                period: payment.period,
            });
        }

        debug!(
            student_id = %id,
            period = %payment.period,
            receipt_number = %payment.receipt_number,
            "Payment stored"
        );
        entry.payments.push(payment);
        Ok(entry.clone())
    }

    fn update_schedule(
        &self,
        id: StudentId,
        schedule: FeeSchedule,
    ) -> Result<StudentFeeRecord, StoreError> {
        let mut entry = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        entry.schedule = schedule;
        debug!(student_id = %id, "Fee schedule stored");
        Ok(entry.clone())
    }

    fn remove_student(&self, id: StudentId) -> Result<StudentFeeRecord, StoreError> {
        let (_, record) = self.records.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.codes.remove(&record.student_code);
        debug!(student_id = %id, payments = record.payments.len(), "Student removed");
        Ok(record)
    }
}
