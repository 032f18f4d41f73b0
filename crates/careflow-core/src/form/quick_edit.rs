//! Inline quick-edit of condition, priority and doctor.
//!
//! Saving takes two steps: `request_confirm` raises the confirmation prompt and
//! only a confirmed save reaches the record service.

use crate::models::{Doctor, Patient, PatientId, Priority};

/// Values being edited inline for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickEditDraft {
    pub id: PatientId,
    pub condition: String,
    pub priority: Priority,
    pub doctor: Doctor,
}

impl QuickEditDraft {
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            id: patient.id.clone(),
            condition: patient.condition.clone(),
            priority: patient.priority,
            doctor: patient.doctor,
        }
    }

    /// The record with the draft applied and a fresh update timestamp.
    pub fn apply_to(&self, patient: &Patient) -> Patient {
        let mut updated = patient.clone();
        updated.condition = self.condition.clone();
        updated.priority = self.priority;
        updated.doctor = self.doctor;
        updated.touch();
        updated
    }
}

/// Quick-edit mode flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuickEdit {
    draft: Option<QuickEditDraft>,
    confirm_pending: bool,
}

impl QuickEdit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the inline editor for a record, replacing any other draft.
    pub fn start(&mut self, patient: &Patient) {
        self.draft = Some(QuickEditDraft::from_patient(patient));
    }

    pub fn draft(&self) -> Option<&QuickEditDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut QuickEditDraft> {
        self.draft.as_mut()
    }

    /// Whether the inline editor is open for `id`.
    pub fn is_editing(&self, id: &PatientId) -> bool {
        self.draft.as_ref().is_some_and(|d| &d.id == id)
    }

    /// Raise the confirmation prompt. Returns false when there is no draft.
    pub fn request_confirm(&mut self) -> bool {
        if self.draft.is_some() {
            self.confirm_pending = true;
        }
        self.confirm_pending
    }

    pub fn confirm_pending(&self) -> bool {
        self.confirm_pending
    }

    /// Dismiss the confirmation prompt, keeping the draft.
    pub fn cancel_confirm(&mut self) {
        self.confirm_pending = false;
    }

    /// Close the inline editor.
    pub fn cancel(&mut self) {
        self.draft = None;
        self.confirm_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::models::{NewPatient, PatientFields};

    fn patient() -> Patient {
        let new = NewPatient::new(
            PatientFields {
                name: "Hannah".into(),
                condition: "Fracture".into(),
                priority: Priority::Critical,
                doctor: Doctor::Banerjee,
                last_visit: NaiveDate::from_ymd_opt(2024, 4, 9).unwrap(),
            },
            Utc::now(),
        );
        Patient::from_new(PatientId::assigned("3"), &new)
    }

    #[test]
    fn test_confirm_requires_draft() {
        let mut quick = QuickEdit::new();
        assert!(!quick.request_confirm());
        assert!(!quick.confirm_pending());

        quick.start(&patient());
        assert!(quick.request_confirm());
        assert!(quick.confirm_pending());
    }

    #[test]
    fn test_cancel_confirm_keeps_draft() {
        let mut quick = QuickEdit::new();
        quick.start(&patient());
        quick.request_confirm();

        quick.cancel_confirm();
        assert!(!quick.confirm_pending());
        assert!(quick.is_editing(&PatientId::assigned("3")));

        quick.cancel();
        assert!(quick.draft().is_none());
    }

    #[test]
    fn test_apply_touches_only_quick_fields() {
        let original = patient();
        let mut quick = QuickEdit::new();
        quick.start(&original);

        let draft = quick.draft_mut().unwrap();
        draft.condition = "Healing".into();
        draft.priority = Priority::Moderate;
        draft.doctor = Doctor::Rao;

        let updated = quick.draft().unwrap().apply_to(&original);
        assert_eq!(updated.condition, "Healing");
        assert_eq!(updated.priority, Priority::Moderate);
        assert_eq!(updated.doctor, Doctor::Rao);
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.last_visit, original.last_visit);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
    }
}
