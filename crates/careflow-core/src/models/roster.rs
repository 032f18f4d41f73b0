//! Fixed vocabularies: triage priority, the doctor roster, and dashboard roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The doctor whose records are visible in the doctor view.
pub const LOGGED_IN_DOCTOR: Doctor = Doctor::Sharma;

/// Errors from parsing roster values typed by a user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseValueError {
    #[error("unknown priority: {0} (expected Stable, Moderate or Critical)")]
    UnknownPriority(String),

    #[error("unknown doctor: {0}")]
    UnknownDoctor(String),

    #[error("unknown role: {0} (expected admin or doctor)")]
    UnknownRole(String),
}

/// Triage priority of a patient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    Stable,
    Moderate,
    Critical,
}

impl Priority {
    /// All priorities, in form order.
    pub const ALL: [Priority; 3] = [Priority::Stable, Priority::Moderate, Priority::Critical];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Stable => "Stable",
            Priority::Moderate => "Moderate",
            Priority::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseValueError::UnknownPriority(s.to_string()))
    }
}

/// Attending doctor, drawn from the clinic's fixed roster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Doctor {
    #[serde(rename = "Dr. Sharma")]
    Sharma,
    #[serde(rename = "Dr. Mehta")]
    Mehta,
    #[serde(rename = "Dr. Rao")]
    Rao,
    #[serde(rename = "Dr. Banerjee")]
    Banerjee,
}

impl Doctor {
    /// The full roster, in display order.
    pub const ROSTER: [Doctor; 4] = [Doctor::Sharma, Doctor::Mehta, Doctor::Rao, Doctor::Banerjee];

    /// Display name, identical to the wire value.
    pub fn name(&self) -> &'static str {
        match self {
            Doctor::Sharma => "Dr. Sharma",
            Doctor::Mehta => "Dr. Mehta",
            Doctor::Rao => "Dr. Rao",
            Doctor::Banerjee => "Dr. Banerjee",
        }
    }

    fn surname(&self) -> &'static str {
        self.name().trim_start_matches("Dr. ")
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Doctor {
    type Err = ParseValueError;

    /// Accepts "Dr. Sharma", "dr sharma" or just "sharma".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let surname = lowered
            .strip_prefix("dr.")
            .or_else(|| lowered.strip_prefix("dr "))
            .unwrap_or(lowered.as_str())
            .trim();

        Doctor::ROSTER
            .into_iter()
            .find(|d| d.surname().eq_ignore_ascii_case(surname))
            .ok_or_else(|| ParseValueError::UnknownDoctor(s.to_string()))
    }
}

/// Dashboard role. A local view toggle, not an access-control boundary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
    Doctor,
}

impl Role {
    /// Whether the view offers add/edit/delete controls.
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Doctor => f.write_str("doctor"),
        }
    }
}

impl FromStr for Role {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            _ => Err(ParseValueError::UnknownRole(s.to_string())),
        }
    }
}
