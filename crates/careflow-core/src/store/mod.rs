//! Client data store: the in-memory patient collection.
//!
//! Mutations are split into a local half that runs before the service call and a
//! settling half that runs after it, so a host event loop does not have to keep the
//! store borrowed while a request is in flight:
//!
//! ```text
//! stage_create ──► service.create ──┬─ ok  ──► commit_create
//!                                   └─ err ──► rollback_create
//!
//! stage_delete ──► service.delete ──┬─ ok  ──► (done)
//!                                   └─ err ──► rollback_delete
//!
//! apply_update ──► service.update        (never rolled back)
//! ```

mod pending;

pub use pending::*;

use chrono::Utc;
use thiserror::Error;
use tracing::warn;

use crate::models::{NewPatient, Patient, PatientFields, PatientId};

/// Store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Patient not found: {0}")]
    NotFound(PatientId),

    #[error("Patient id already in use: {0}")]
    DuplicateId(PatientId),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The dashboard's patient collection. Ids are unique within it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientStore {
    patients: Vec<Patient>,
}

impl PatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded records, dropping duplicate ids.
    pub fn from_records(records: Vec<Patient>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    /// Replace the whole collection. Returns how many duplicates were dropped.
    ///
    /// The first record seen for an id wins.
    pub fn replace_all(&mut self, records: Vec<Patient>) -> usize {
        let total = records.len();
        let mut kept: Vec<Patient> = Vec::with_capacity(total);
        for record in records {
            if kept.iter().any(|p| p.id == record.id) {
                warn!(id = %record.id, "dropping duplicate patient id");
                continue;
            }
            kept.push(record);
        }

        let dropped = total - kept.len();
        self.patients = kept;
        dropped
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn get(&self, id: &PatientId) -> Option<&Patient> {
        self.patients.iter().find(|p| &p.id == id)
    }

    fn position(&self, id: &PatientId) -> Option<usize> {
        self.patients.iter().position(|p| &p.id == id)
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Insert a placeholder for a new record and return the pending create.
    pub fn stage_create(&mut self, fields: PatientFields) -> PendingCreate {
        let request = NewPatient::new(fields, Utc::now());
        let placeholder = Patient::placeholder(&request);
        let placeholder_id = placeholder.id.clone();
        self.patients.push(placeholder);

        PendingCreate {
            placeholder_id,
            request,
        }
    }

    /// Swap the placeholder for the record returned by the service.
    ///
    /// A saved id that already names another record is a conflict: the existing
    /// record is kept, the placeholder is dropped and `DuplicateId` is returned.
    pub fn commit_create(&mut self, pending: PendingCreate, saved: Patient) -> StoreResult<()> {
        if self.position(&saved.id).is_some() {
            warn!(id = %saved.id, "service reissued an id already in the collection");
            self.patients.retain(|p| p.id != pending.placeholder_id);
            return Err(StoreError::DuplicateId(saved.id));
        }

        match self.position(&pending.placeholder_id) {
            Some(index) => self.patients[index] = saved,
            None => {
                warn!(
                    placeholder = %pending.placeholder_id,
                    id = %saved.id,
                    "placeholder vanished before create resolved; appending record"
                );
                self.patients.push(saved);
            }
        }
        Ok(())
    }

    /// Remove the placeholder, leaving the collection as it was before staging.
    pub fn rollback_create(&mut self, pending: PendingCreate) {
        self.patients.retain(|p| p.id != pending.placeholder_id);
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Replace the record with the same id.
    pub fn apply_update(&mut self, patient: Patient) -> StoreResult<()> {
        let index = self
            .position(&patient.id)
            .ok_or_else(|| StoreError::NotFound(patient.id.clone()))?;
        self.patients[index] = patient;
        Ok(())
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Remove a record and return the pending delete.
    pub fn stage_delete(&mut self, id: &PatientId) -> StoreResult<PendingDelete> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let patient = self.patients.remove(index);
        Ok(PendingDelete { index, patient })
    }

    /// Put a removed record back where it was.
    pub fn rollback_delete(&mut self, pending: PendingDelete) {
        if self.position(&pending.patient.id).is_some() {
            warn!(id = %pending.patient.id, "record already restored; skipping rollback");
            return;
        }
        let index = pending.index.min(self.patients.len());
        self.patients.insert(index, pending.patient);
    }
}
