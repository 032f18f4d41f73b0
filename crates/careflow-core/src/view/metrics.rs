//! Header metrics over the whole collection.

use serde::Serialize;

use crate::models::{Patient, Priority};

/// Patient counts shown above the list. Filters never apply.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct Metrics {
    pub total: usize,
    pub critical: usize,
    pub stable: usize,
}

impl Metrics {
    pub fn compute(patients: &[Patient]) -> Self {
        let count = |priority: Priority| patients.iter().filter(|p| p.priority == priority).count();
        Self {
            total: patients.len(),
            critical: count(Priority::Critical),
            stable: count(Priority::Stable),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::models::{Doctor, NewPatient, PatientFields, PatientId};

    fn with_priority(id: usize, priority: Priority) -> Patient {
        let new = NewPatient::new(
            PatientFields {
                name: format!("Patient {}", id),
                condition: "Review".into(),
                priority,
                doctor: Doctor::Mehta,
                last_visit: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            },
            Utc::now(),
        );
        Patient::from_new(PatientId::assigned(id.to_string()), &new)
    }

    #[test]
    fn test_counts_by_priority() {
        let patients: Vec<_> = [
            Priority::Critical,
            Priority::Critical,
            Priority::Stable,
            Priority::Moderate,
            Priority::Stable,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, p)| with_priority(i, p))
        .collect();

        let metrics = Metrics::compute(&patients);
        assert_eq!(
            metrics,
            Metrics {
                total: 5,
                critical: 2,
                stable: 2,
            }
        );
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(Metrics::compute(&[]), Metrics::default());
    }
}
