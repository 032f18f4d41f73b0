//! The record service seam.
//!
//! The dashboard talks to durable storage only through [`RecordService`]:
//!
//! | Operation | Effect on the service          | Caller's reaction to failure     |
//! |-----------|--------------------------------|----------------------------------|
//! | `list`    | read the whole collection      | show an empty collection         |
//! | `create`  | persist a record, issue its id | roll back the optimistic insert  |
//! | `update`  | replace a record               | keep the local change            |
//! | `delete`  | remove a record                | restore the removed record       |
//!
//! Every operation is a single attempt. Implementations log their own failures and
//! hand them back unchanged.

mod memory;

pub use memory::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewPatient, Patient, PatientId};

/// Record service errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("record service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("undecodable response: {0}")]
    Decode(String),

    #[error("record {0} has no service-assigned id yet")]
    UnassignedId(PatientId),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// CRUD contract of the remote patient collection.
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Fetch every patient record.
    async fn list(&self) -> ServiceResult<Vec<Patient>>;

    /// Persist a new record and return it with its service-assigned id.
    async fn create(&self, patient: &NewPatient) -> ServiceResult<Patient>;

    /// Replace the record stored under `id`.
    async fn update(&self, id: &PatientId, patient: &Patient) -> ServiceResult<()>;

    /// Remove the record stored under `id`.
    async fn delete(&self, id: &PatientId) -> ServiceResult<()>;
}

/// Resolve the id used in a request path, refusing placeholders.
pub fn require_assigned(id: &PatientId) -> ServiceResult<&str> {
    id.as_assigned()
        .ok_or_else(|| ServiceError::UnassignedId(id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_assigned() {
        let id = PatientId::assigned("42");
        assert_eq!(require_assigned(&id).unwrap(), "42");

        let pending = PatientId::pending();
        assert_eq!(
            require_assigned(&pending),
            Err(ServiceError::UnassignedId(pending.clone()))
        );
    }

    #[test]
    fn test_status_error_message() {
        let error = ServiceError::Status {
            status: 503,
            message: "maintenance".into(),
        };
        assert_eq!(
            error.to_string(),
            "record service returned status 503: maintenance"
        );
    }
}
