//! Patient models.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::roster::{Doctor, Priority};

const PENDING_PREFIX: &str = "pending-";

/// Identifier of a patient record.
///
/// Records only get an `Assigned` id from the record service. Until a create call
/// resolves, the optimistic placeholder carries a `Pending` id that is never sent
/// over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatientId {
    /// Opaque id issued by the record service
    Assigned(String),
    /// Client-generated placeholder
    Pending(Uuid),
}

impl PatientId {
    pub fn assigned(id: impl Into<String>) -> Self {
        PatientId::Assigned(id.into())
    }

    /// Fresh placeholder id for an optimistic insert.
    pub fn pending() -> Self {
        PatientId::Pending(Uuid::new_v4())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, PatientId::Pending(_))
    }

    /// The service-assigned id, if there is one.
    pub fn as_assigned(&self) -> Option<&str> {
        match self {
            PatientId::Assigned(id) => Some(id),
            PatientId::Pending(_) => None,
        }
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientId::Assigned(id) => f.write_str(id),
            PatientId::Pending(uuid) => write!(f, "{}{}", PENDING_PREFIX, uuid),
        }
    }
}

impl Serialize for PatientId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PatientId {
    /// Services hand out either string or numeric ids; both are kept as text.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => PatientId::Assigned(text),
            RawId::Number(number) => PatientId::Assigned(number.to_string()),
        })
    }
}

/// The user-editable part of a patient record, as validated by the form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientFields {
    pub name: String,
    pub condition: String,
    pub priority: Priority,
    pub doctor: Doctor,
    pub last_visit: NaiveDate,
}

/// Body of a create request: everything except the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    #[serde(flatten)]
    pub fields: PatientFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewPatient {
    /// Stamp validated fields with creation and update times.
    pub fn new(fields: PatientFields, now: DateTime<Utc>) -> Self {
        Self {
            fields,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A patient tracked by the clinic dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Service-assigned id, or a placeholder while the create is in flight
    pub id: PatientId,
    /// Patient name
    pub name: String,
    /// Medical condition, free text
    pub condition: String,
    /// Triage priority
    pub priority: Priority,
    /// Attending doctor
    pub doctor: Doctor,
    /// Date of the last visit
    pub last_visit: NaiveDate,
    /// Creation timestamp (absent on records created by older clients)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Patient {
    /// Build a record from a create request and the id to give it.
    pub fn from_new(id: PatientId, new: &NewPatient) -> Self {
        let fields = new.fields.clone();
        Self {
            id,
            name: fields.name,
            condition: fields.condition,
            priority: fields.priority,
            doctor: fields.doctor,
            last_visit: fields.last_visit,
            created_at: Some(new.created_at),
            updated_at: Some(new.updated_at),
        }
    }

    /// Placeholder shown while the create call is in flight.
    pub fn placeholder(new: &NewPatient) -> Self {
        Self::from_new(PatientId::pending(), new)
    }

    pub fn is_pending(&self) -> bool {
        self.id.is_pending()
    }

    /// Copy out the editable fields.
    pub fn fields(&self) -> PatientFields {
        PatientFields {
            name: self.name.clone(),
            condition: self.condition.clone(),
            priority: self.priority,
            doctor: self.doctor,
            last_visit: self.last_visit,
        }
    }

    /// Overwrite the editable fields, keeping id and timestamps.
    pub fn apply_fields(&mut self, fields: PatientFields) {
        self.name = fields.name;
        self.condition = fields.condition;
        self.priority = fields.priority;
        self.doctor = fields.doctor;
        self.last_visit = fields.last_visit;
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
