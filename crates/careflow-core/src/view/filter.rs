//! Visible-subset computation: role, doctor filter, name search, sort.

use std::fmt;
use std::str::FromStr;

use crate::models::{Doctor, ParseValueError, Patient, Role, LOGGED_IN_DOCTOR};

/// Admin-only doctor filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DoctorFilter {
    #[default]
    All,
    Only(Doctor),
}

impl DoctorFilter {
    fn admits(&self, patient: &Patient) -> bool {
        match self {
            DoctorFilter::All => true,
            DoctorFilter::Only(doctor) => patient.doctor == *doctor,
        }
    }
}

impl fmt::Display for DoctorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoctorFilter::All => f.write_str("all"),
            DoctorFilter::Only(doctor) => fmt::Display::fmt(doctor, f),
        }
    }
}

impl FromStr for DoctorFilter {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(DoctorFilter::All);
        }
        s.parse().map(DoctorFilter::Only)
    }
}

/// Case-insensitive substring match on a patient name. An empty query matches.
pub fn matches_name(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Filter state of the patient list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    role: Role,
    doctor_filter: DoctorFilter,
    search: String,
}

impl ViewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn doctor_filter(&self) -> DoctorFilter {
        self.doctor_filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Switch role. A role change clears the search text.
    pub fn set_role(&mut self, role: Role) {
        if self.role != role {
            self.role = role;
            self.search.clear();
        }
    }

    pub fn set_doctor_filter(&mut self, filter: DoctorFilter) {
        self.doctor_filter = filter;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Whether a record passes every active filter.
    ///
    /// The doctor view is pinned to the logged-in doctor, so the doctor filter
    /// only applies to admins.
    pub fn admits(&self, patient: &Patient) -> bool {
        let in_scope = match self.role {
            Role::Admin => self.doctor_filter.admits(patient),
            Role::Doctor => patient.doctor == LOGGED_IN_DOCTOR,
        };
        in_scope && matches_name(&patient.name, &self.search)
    }

    /// Visible records, most recent visit first.
    pub fn apply<'a>(&self, patients: &'a [Patient]) -> Vec<&'a Patient> {
        let mut visible: Vec<&Patient> = patients.iter().filter(|p| self.admits(p)).collect();
        visible.sort_by(|a, b| b.last_visit.cmp(&a.last_visit));
        visible
    }
}
