//! `careflow`: operate the clinic patient dashboard from a terminal.

use anyhow::Context;
use careflow_api::{ApiConfig, HttpRecordService, API_URL_ENV, DEFAULT_API_URL};
use careflow_core::view::display_date;
use careflow_core::{
    Dashboard, Doctor, DoctorFilter, Patient, PatientId, Priority, RecordService, Role,
    SubmitOutcome,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tokio::runtime::Builder;
use tracing_subscriber::EnvFilter;
use url::Url;

const QUICK_EDIT_HINT: &str = "not saved; re-run with --yes to confirm the update";

/// `careflow` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "careflow",
    about = "Track clinic patients against a CareFlow record service",
    version
)]
struct CliArgs {
    /// Base URL of the record service.
    #[arg(long = "base-url", value_name = "url", env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    base_url: Url,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show visible patients, most recent visit first.
    List {
        /// View to render: admin or doctor.
        #[arg(long, default_value = "admin")]
        role: Role,
        /// Doctor filter (admin view only): "all" or a roster name.
        #[arg(long, default_value = "all")]
        doctor: DoctorFilter,
        /// Case-insensitive name search.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show total, critical and stable counts.
    Metrics,
    /// Add a patient.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        condition: String,
        #[arg(long)]
        priority: Priority,
        #[arg(long)]
        doctor: Doctor,
        /// Date of the last visit, YYYY-MM-DD.
        #[arg(long = "last-visit", value_name = "date")]
        last_visit: NaiveDate,
    },
    /// Edit every field of a patient. Omitted fields keep their value.
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        doctor: Option<Doctor>,
        #[arg(long = "last-visit", value_name = "date")]
        last_visit: Option<NaiveDate>,
    },
    /// Change condition, priority or doctor after confirmation.
    QuickEdit {
        id: String,
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        doctor: Option<Doctor>,
        /// Confirm the change; without it the change is only shown.
        #[arg(long)]
        yes: bool,
    },
    /// Delete a patient.
    Delete { id: String },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("create Tokio runtime")?;
    runtime.block_on(run(args))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {error}");
    }
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = ApiConfig::new(args.base_url)?;
    let service = HttpRecordService::new(config).context("build HTTP client")?;
    let mut dashboard = Dashboard::new(service);
    dashboard.load().await;

    match args.command {
        Command::List {
            role,
            doctor,
            search,
        } => {
            dashboard.set_role(role);
            dashboard.set_doctor_filter(doctor);
            dashboard.set_search(search);
            print_patients(&dashboard.visible_patients());
        }
        Command::Metrics => {
            let metrics = dashboard.metrics();
            println!("total     {}", metrics.total);
            println!("critical  {}", metrics.critical);
            println!("stable    {}", metrics.stable);
        }
        Command::Add {
            name,
            condition,
            priority,
            doctor,
            last_visit,
        } => {
            let form = dashboard.form_mut();
            form.set_name(name);
            form.set_condition(condition);
            form.set_priority(Some(priority));
            form.set_doctor(Some(doctor));
            form.set_last_visit(Some(last_visit));
            report(dashboard.submit_form().await?);
        }
        Command::Edit {
            id,
            name,
            condition,
            priority,
            doctor,
            last_visit,
        } => {
            dashboard.start_edit(&PatientId::assigned(id))?;
            let form = dashboard.form_mut();
            if let Some(name) = name {
                form.set_name(name);
            }
            if let Some(condition) = condition {
                form.set_condition(condition);
            }
            if priority.is_some() {
                form.set_priority(priority);
            }
            if doctor.is_some() {
                form.set_doctor(doctor);
            }
            if last_visit.is_some() {
                form.set_last_visit(last_visit);
            }
            report(dashboard.submit_form().await?);
        }
        Command::QuickEdit {
            id,
            condition,
            priority,
            doctor,
            yes,
        } => {
            let changes = QuickChanges {
                condition,
                priority,
                doctor,
            };
            quick_edit(&mut dashboard, PatientId::assigned(id), changes, yes).await?;
        }
        Command::Delete { id } => {
            let id = PatientId::assigned(id);
            dashboard.delete(&id).await?;
            println!("deleted patient {id}");
        }
    }

    Ok(())
}

struct QuickChanges {
    condition: Option<String>,
    priority: Option<Priority>,
    doctor: Option<Doctor>,
}

/// Show the quick-edit change and send it only when `confirmed`.
async fn quick_edit<S: RecordService>(
    dashboard: &mut Dashboard<S>,
    id: PatientId,
    changes: QuickChanges,
    confirmed: bool,
) -> anyhow::Result<()> {
    dashboard.start_quick_edit(&id)?;
    if let Some(draft) = dashboard.quick_edit_draft_mut() {
        if let Some(condition) = changes.condition {
            draft.condition = condition;
        }
        if let Some(priority) = changes.priority {
            draft.priority = priority;
        }
        if let Some(doctor) = changes.doctor {
            draft.doctor = doctor;
        }
    }
    dashboard.request_quick_save()?;

    if let Some(draft) = dashboard.quick_edit().draft() {
        println!(
            "patient {}: condition={:?} priority={} doctor={}",
            draft.id, draft.condition, draft.priority, draft.doctor
        );
    }
    if confirmed {
        dashboard.confirm_quick_save().await?;
        println!("updated patient {id}");
    } else {
        dashboard.cancel_quick_save();
        println!("{QUICK_EDIT_HINT}");
    }
    Ok(())
}

fn report(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Created(id) => println!("created patient {id}"),
        SubmitOutcome::Updated(id) => println!("updated patient {id}"),
    }
}

fn print_patients(patients: &[&Patient]) {
    if patients.is_empty() {
        println!("No patients found. Add a patient or adjust filters.");
        return;
    }

    for patient in patients {
        let updated = patient
            .updated_at
            .map(|at| display_date(at.date_naive()))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<20} {:<20} {:<9} {:<13} visited {}  updated {}",
            patient.id.to_string(),
            patient.name,
            patient.condition,
            patient.priority.label(),
            patient.doctor.name(),
            display_date(patient.last_visit),
            updated,
        );
    }
}

#[cfg(test)]
mod tests {
    use careflow_core::service::Operation;
    use careflow_core::{InMemoryRecordService, NewPatient, PatientFields};
    use chrono::{NaiveDate, Utc};

    use super::*;

    async fn dashboard_with_one() -> Dashboard<InMemoryRecordService> {
        let new = NewPatient::new(
            PatientFields {
                name: "Anita".into(),
                condition: "Asthma".into(),
                priority: Priority::Moderate,
                doctor: Doctor::Sharma,
                last_visit: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            },
            Utc::now(),
        );
        let seeded = Patient::from_new(PatientId::assigned("1"), &new);
        let mut dashboard = Dashboard::new(InMemoryRecordService::with_records(vec![seeded]));
        dashboard.load().await;
        dashboard
    }

    fn critical() -> QuickChanges {
        QuickChanges {
            condition: None,
            priority: Some(Priority::Critical),
            doctor: None,
        }
    }

    #[tokio::test]
    async fn test_unconfirmed_quick_edit_succeeds_without_sending() {
        let mut dashboard = dashboard_with_one().await;

        let result = quick_edit(&mut dashboard, PatientId::assigned("1"), critical(), false).await;

        assert!(result.is_ok());
        assert_eq!(dashboard.service().calls(), vec![Operation::List]);
        assert_eq!(dashboard.patients()[0].priority, Priority::Moderate);
        assert!(!dashboard.quick_edit().confirm_pending());
    }

    #[tokio::test]
    async fn test_confirmed_quick_edit_sends_update() {
        let mut dashboard = dashboard_with_one().await;

        quick_edit(&mut dashboard, PatientId::assigned("1"), critical(), true)
            .await
            .unwrap();

        assert_eq!(
            dashboard.service().calls(),
            vec![Operation::List, Operation::Update]
        );
        assert_eq!(dashboard.service().records()[0].priority, Priority::Critical);
    }

    #[test]
    fn test_quick_edit_args_parse() {
        let args = CliArgs::try_parse_from([
            "careflow",
            "--base-url",
            "http://localhost:3000",
            "quick-edit",
            "1",
            "--priority",
            "critical",
        ])
        .unwrap();

        assert!(matches!(
            args.command,
            Command::QuickEdit { yes: false, priority: Some(Priority::Critical), .. }
        ));
    }
}
