//! In-memory record service for tests and offline demos.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{require_assigned, RecordService, ServiceError, ServiceResult};
use crate::models::{NewPatient, Patient, PatientId};

/// Which record service call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
struct MemoryState {
    records: Vec<Patient>,
    next_id: u64,
    failures: VecDeque<(Operation, ServiceError)>,
    calls: Vec<Operation>,
}

impl MemoryState {
    /// Pop the first scripted failure for `operation`, if any.
    fn take_failure(&mut self, operation: Operation) -> Option<ServiceError> {
        let index = self.failures.iter().position(|(op, _)| *op == operation)?;
        self.failures.remove(index).map(|(_, error)| error)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|p| p.id.as_assigned() == Some(id))
    }
}

/// Record service backed by a `Vec`, with scripted failures.
///
/// Ids are issued as increasing integers rendered as text, starting after the
/// largest numeric seeded id.
pub struct InMemoryRecordService {
    state: Mutex<MemoryState>,
}

impl InMemoryRecordService {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seed the service with existing records.
    pub fn with_records(records: Vec<Patient>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|p| p.id.as_assigned()?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            state: Mutex::new(MemoryState {
                records,
                next_id,
                ..MemoryState::default()
            }),
        }
    }

    /// Make the next call of `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: ServiceError) {
        self.lock().failures.push_back((operation, error));
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<Patient> {
        self.lock().records.clone()
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // State is plain data; a panic mid-update cannot leave it half-written.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, operation: Operation) -> ServiceResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.calls.push(operation);
        match state.take_failure(operation) {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

impl Default for InMemoryRecordService {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: &str) -> ServiceError {
    ServiceError::Status {
        status: 404,
        message: format!("no patient with id {}", id),
    }
}

#[async_trait]
impl RecordService for InMemoryRecordService {
    async fn list(&self) -> ServiceResult<Vec<Patient>> {
        let state = self.begin(Operation::List)?;
        Ok(state.records.clone())
    }

    async fn create(&self, patient: &NewPatient) -> ServiceResult<Patient> {
        let mut state = self.begin(Operation::Create)?;
        let id = PatientId::assigned(state.next_id.to_string());
        state.next_id += 1;

        let saved = Patient::from_new(id, patient);
        state.records.push(saved.clone());
        Ok(saved)
    }

    async fn update(&self, id: &PatientId, patient: &Patient) -> ServiceResult<()> {
        let mut state = self.begin(Operation::Update)?;
        let key = require_assigned(id)?;
        let index = state.position(key).ok_or_else(|| not_found(key))?;

        let mut stored = patient.clone();
        stored.id = id.clone();
        state.records[index] = stored;
        Ok(())
    }

    async fn delete(&self, id: &PatientId) -> ServiceResult<()> {
        let mut state = self.begin(Operation::Delete)?;
        let key = require_assigned(id)?;
        let index = state.position(key).ok_or_else(|| not_found(key))?;

        state.records.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::models::{Doctor, PatientFields, Priority};

    fn new_patient(name: &str) -> NewPatient {
        NewPatient::new(
            PatientFields {
                name: name.into(),
                condition: "Checkup".into(),
                priority: Priority::Stable,
                doctor: Doctor::Mehta,
                last_visit: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let service = InMemoryRecordService::new();

        let first = service.create(&new_patient("Anita")).await.unwrap();
        let second = service.create(&new_patient("Ravi")).await.unwrap();

        assert_eq!(first.id, PatientId::assigned("1"));
        assert_eq!(second.id, PatientId::assigned("2"));
        assert_eq!(service.records().len(), 2);
    }

    #[tokio::test]
    async fn test_create_skips_seeded_ids() {
        let seeded = ["2", "3"]
            .into_iter()
            .map(|id| Patient::from_new(PatientId::assigned(id), &new_patient("Seed")))
            .collect();
        let service = InMemoryRecordService::with_records(seeded);

        let saved = service.create(&new_patient("Meera")).await.unwrap();

        assert_eq!(saved.id, PatientId::assigned("4"));
        let ids: Vec<_> = service.records().into_iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec![
                PatientId::assigned("2"),
                PatientId::assigned("3"),
                PatientId::assigned("4"),
            ]
        );
    }

    #[tokio::test]
    async fn test_scripted_failure_applies_once() {
        let service = InMemoryRecordService::new();
        service.fail_next(Operation::List, ServiceError::Transport("offline".into()));

        assert!(service.list().await.is_err());
        assert!(service.list().await.is_ok());
        assert_eq!(service.calls(), vec![Operation::List, Operation::List]);
    }

    #[tokio::test]
    async fn test_failure_only_hits_its_operation() {
        let service = InMemoryRecordService::new();
        service.fail_next(Operation::Delete, ServiceError::Transport("offline".into()));

        assert!(service.create(&new_patient("Anita")).await.is_ok());
        assert!(service.delete(&PatientId::assigned("1")).await.is_err());
        assert_eq!(service.records().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let service = InMemoryRecordService::new();
        let saved = service.create(&new_patient("Anita")).await.unwrap();

        let missing = PatientId::assigned("99");
        assert!(matches!(
            service.update(&missing, &saved).await,
            Err(ServiceError::Status { status: 404, .. })
        ));
        assert!(matches!(
            service.delete(&missing).await,
            Err(ServiceError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_pending_id_refused() {
        let service = InMemoryRecordService::new();
        let pending = PatientId::pending();

        assert!(matches!(
            service.delete(&pending).await,
            Err(ServiceError::UnassignedId(_))
        ));
    }
}
