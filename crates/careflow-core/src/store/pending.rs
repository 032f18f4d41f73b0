//! Tokens for optimistic changes awaiting the record service.

use crate::models::{NewPatient, Patient, PatientId};

/// An optimistic insert whose create call has not resolved.
#[derive(Debug, Clone)]
#[must_use = "a staged create must be committed or rolled back"]
pub struct PendingCreate {
    pub(super) placeholder_id: PatientId,
    pub(super) request: NewPatient,
}

impl PendingCreate {
    /// Id of the placeholder currently in the collection.
    pub fn placeholder_id(&self) -> &PatientId {
        &self.placeholder_id
    }

    /// Body to send to the record service.
    pub fn request(&self) -> &NewPatient {
        &self.request
    }
}

/// An optimistic removal whose delete call has not resolved.
#[derive(Debug, Clone)]
#[must_use = "a staged delete must be rolled back if the service refuses it"]
pub struct PendingDelete {
    pub(super) index: usize,
    pub(super) patient: Patient,
}

impl PendingDelete {
    /// The removed record.
    pub fn patient(&self) -> &Patient {
        &self.patient
    }
}
