//! CareFlow Core Library
//!
//! Client data store for a single-page clinic dashboard that tracks patients.
//!
//! # Architecture
//!
//! ```text
//!            startup                          user actions
//!               │                                  │
//!        RecordService::list          ┌────────────┼─────────────┐
//!               │                     │            │             │
//!               ▼                  add/edit    quick edit      delete
//!        ┌─────────────┐           (form)    (confirmation)      │
//!        │ PatientStore│◄── optimistic apply ──────┴─────────────┘
//!        └──────┬──────┘                  │
//!               │                 RecordService::{create,update,delete}
//!               │                         │
//!               │                  failure: roll back create/delete,
//!               │                           keep update
//!               ▼
//!     ViewFilter (role, doctor, search, sort)  +  Metrics (unfiltered)
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, PatientId, Priority, Doctor, Role)
//! - [`service`]: The `RecordService` seam and an in-memory implementation
//! - [`store`]: Optimistic patient collection with staged create/delete
//! - [`form`]: Add/edit form validation and the inline quick-edit flow
//! - [`view`]: Filtering, sorting and metrics
//! - [`dashboard`]: Controller tying the pieces together

pub mod dashboard;
pub mod form;
pub mod models;
pub mod service;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use dashboard::{Dashboard, SubmitOutcome};
pub use form::{FormField, PatientForm, QuickEdit, QuickEditDraft, ValidationError};
pub use models::{
    Doctor, NewPatient, Patient, PatientFields, PatientId, Priority, Role, LOGGED_IN_DOCTOR,
};
pub use service::{InMemoryRecordService, RecordService, ServiceError, ServiceResult};
pub use store::{PatientStore, StoreError};
pub use view::{DoctorFilter, Metrics, ViewFilter};

// =========================================================================
// Dashboard Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("The {0} view cannot modify records")]
    ReadOnlyRole(Role),

    #[error("Patient records are still loading")]
    Loading,

    #[error("Record {0} is still being created")]
    PendingRecord(PatientId),

    #[error("No quick edit in progress")]
    NoQuickEdit,

    #[error("Quick edit has not been confirmed")]
    ConfirmationRequired,
}

pub type DashboardResult<T> = Result<T, DashboardError>;
