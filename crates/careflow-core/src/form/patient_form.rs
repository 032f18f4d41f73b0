//! The add/edit patient form.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Doctor, Patient, PatientFields, PatientId, Priority};

/// A required form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Condition,
    Priority,
    Doctor,
    LastVisit,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormField::Name => "name",
            FormField::Condition => "condition",
            FormField::Priority => "priority",
            FormField::Doctor => "doctor",
            FormField::LastVisit => "last visit",
        })
    }
}

/// Submission blocked because required fields are empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("All fields are required")]
pub struct ValidationError {
    /// Fields that were empty, in form order
    pub missing: Vec<FormField>,
}

/// Form state for adding a patient or editing an existing one.
///
/// Changing any field dismisses the current validation message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientForm {
    name: String,
    condition: String,
    priority: Option<Priority>,
    doctor: Option<Doctor>,
    last_visit: Option<NaiveDate>,
    editing: Option<PatientId>,
    error: Option<ValidationError>,
}

impl PatientForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn doctor(&self) -> Option<Doctor> {
        self.doctor
    }

    pub fn last_visit(&self) -> Option<NaiveDate> {
        self.last_visit
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.error = None;
    }

    pub fn set_condition(&mut self, condition: impl Into<String>) {
        self.condition = condition.into();
        self.error = None;
    }

    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.priority = priority;
        self.error = None;
    }

    pub fn set_doctor(&mut self, doctor: Option<Doctor>) {
        self.doctor = doctor;
        self.error = None;
    }

    pub fn set_last_visit(&mut self, last_visit: Option<NaiveDate>) {
        self.last_visit = last_visit;
        self.error = None;
    }

    /// Id of the record being edited, or `None` when adding.
    pub fn editing(&self) -> Option<&PatientId> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// The validation message currently shown, if any.
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Fill the form from an existing record and switch to edit mode.
    pub fn load(&mut self, patient: &Patient) {
        self.editing = Some(patient.id.clone());
        self.name = patient.name.clone();
        self.condition = patient.condition.clone();
        self.priority = Some(patient.priority);
        self.doctor = Some(patient.doctor);
        self.last_visit = Some(patient.last_visit);
    }

    /// Clear the field values. Edit mode is left as is.
    pub fn reset(&mut self) {
        self.name.clear();
        self.condition.clear();
        self.priority = None;
        self.doctor = None;
        self.last_visit = None;
    }

    /// Leave edit mode and clear the fields.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.reset();
    }

    /// Check that every required field is filled in.
    ///
    /// Text fields count as empty when blank after trimming. On failure the
    /// error is also kept on the form for display; on success it is cleared.
    pub fn validate(&mut self) -> Result<PatientFields, ValidationError> {
        let name = self.name.trim();
        let condition = self.condition.trim();

        let mut missing = Vec::new();
        if name.is_empty() {
            missing.push(FormField::Name);
        }
        if condition.is_empty() {
            missing.push(FormField::Condition);
        }
        if self.priority.is_none() {
            missing.push(FormField::Priority);
        }
        if self.doctor.is_none() {
            missing.push(FormField::Doctor);
        }
        if self.last_visit.is_none() {
            missing.push(FormField::LastVisit);
        }

        match (self.priority, self.doctor, self.last_visit) {
            (Some(priority), Some(doctor), Some(last_visit)) if missing.is_empty() => {
                let fields = PatientFields {
                    name: name.to_string(),
                    condition: condition.to_string(),
                    priority,
                    doctor,
                    last_visit,
                };
                self.error = None;
                Ok(fields)
            }
            _ => {
                let error = ValidationError { missing };
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::NewPatient;

    fn filled() -> PatientForm {
        let mut form = PatientForm::new();
        form.set_name("Anita");
        form.set_condition("Migraine");
        form.set_priority(Some(Priority::Stable));
        form.set_doctor(Some(Doctor::Sharma));
        form.set_last_visit(NaiveDate::from_ymd_opt(2024, 5, 2));
        form
    }

    #[test]
    fn test_empty_form_lists_every_field() {
        let mut form = PatientForm::new();
        let error = form.validate().unwrap_err();

        assert_eq!(
            error.missing,
            vec![
                FormField::Name,
                FormField::Condition,
                FormField::Priority,
                FormField::Doctor,
                FormField::LastVisit,
            ]
        );
        assert_eq!(error.to_string(), "All fields are required");
        assert_eq!(form.error(), Some(&error));
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        let mut form = filled();
        form.set_condition("   ");

        let error = form.validate().unwrap_err();
        assert_eq!(error.missing, vec![FormField::Condition]);
    }

    #[test]
    fn test_valid_form_trims_and_clears_error() {
        let mut form = filled();
        form.set_name("  Anita ");
        form.set_doctor(None);
        assert!(form.validate().is_err());

        form.set_doctor(Some(Doctor::Mehta));
        assert!(form.error().is_none());

        let fields = form.validate().unwrap();
        assert_eq!(fields.name, "Anita");
        assert_eq!(fields.doctor, Doctor::Mehta);
        assert!(form.error().is_none());
    }

    #[test]
    fn test_any_edit_dismisses_error() {
        let mut form = PatientForm::new();
        assert!(form.validate().is_err());
        assert!(form.error().is_some());

        form.set_name("A");
        assert!(form.error().is_none());
    }

    #[test]
    fn test_load_and_cancel_edit() {
        let new = NewPatient::new(filled().validate().unwrap(), Utc::now());
        let patient = Patient::from_new(PatientId::assigned("5"), &new);

        let mut form = PatientForm::new();
        form.load(&patient);
        assert_eq!(form.editing(), Some(&PatientId::assigned("5")));
        assert_eq!(form.name(), "Anita");
        assert_eq!(form.priority(), Some(Priority::Stable));

        form.cancel_edit();
        assert!(!form.is_editing());
        assert_eq!(form, PatientForm::new());
    }

    #[test]
    fn test_reset_keeps_edit_mode() {
        let mut form = filled();
        form.editing = Some(PatientId::assigned("5"));

        form.reset();
        assert!(form.is_editing());
        assert!(form.name().is_empty());
        assert!(form.last_visit().is_none());
    }
}
