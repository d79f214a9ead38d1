// libs/appointment-cell/src/services/reporting.rs
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use tracing::{debug, error, info, warn};

use doctor_cell::{DoctorError, DoctorService};
use notification_cell::ChannelNotifier;
use shared_database::{AppointmentFilter, ClinicStore};
use shared_utils::strip_doctor_title;

use crate::models::{AppointmentCellState, AppointmentError, Report, ReportEntry, ReportPeriod};

const SYMPTOM_QUERY_PREFIX: &str = "how many patients with";

pub struct ReportingService {
    store: Arc<dyn ClinicStore>,
    channel: Arc<dyn ChannelNotifier>,
    doctors: DoctorService,
}

impl ReportingService {
    pub fn new(store: Arc<dyn ClinicStore>, channel: Arc<dyn ChannelNotifier>) -> Self {
        Self {
            doctors: DoctorService::new(Arc::clone(&store)),
            store,
            channel,
        }
    }

    pub fn from_state(state: &AppointmentCellState) -> Self {
        Self::new(Arc::clone(&state.store), Arc::clone(&state.channel))
    }

    pub async fn summarize(&self, query: &str, doctor_name: Option<&str>) -> Result<Report, AppointmentError> {
        self.summarize_on(query, doctor_name, Local::now().date_naive()).await
    }

    pub async fn summarize_on(
        &self,
        query: &str,
        doctor_name: Option<&str>,
        today: NaiveDate,
    ) -> Result<Report, AppointmentError> {
        let doctor_name = doctor_name.map(str::trim).filter(|name| !name.is_empty());
        let mut query = query.to_lowercase();

        let doctor = match doctor_name {
            Some(name) => {
                query = strip_doctor_phrase(&query, name);
                match self.doctors.find_by_name(name).await {
                    Ok(doctor) => Some(doctor),
                    Err(DoctorError::NotFound(query)) => return Ok(Report::DoctorNotFound { query }),
                    Err(e) => return Err(e.into()),
                }
            }
            None => None,
        };
        let doctor_id = doctor.as_ref().map(|d| d.id);

        let period = if query.contains("yesterday") {
            Some(ReportPeriod::Yesterday)
        } else if query.contains("today") {
            Some(ReportPeriod::Today)
        } else {
            None
        };

        if let Some(period) = period {
            let day = match period {
                ReportPeriod::Today => today,
                ReportPeriod::Yesterday => today - Duration::days(1),
            };
            let mut filter = AppointmentFilter::day(day);
            if let Some(id) = doctor_id {
                filter = filter.for_doctor(id);
            }

            let appointments = self.store.appointments_between(filter).await?;
            let mut entries = Vec::with_capacity(appointments.len());
            for appointment in appointments {
                let patient = self.store.find_patient(appointment.patient_id).await?;
                entries.push(ReportEntry {
                    appointment_time: appointment.appointment_time,
                    patient_email: patient.map(|p| p.email),
                });
            }

            debug!("Day report for {}: {} appointments", day, entries.len());
            return Ok(Report::DayListing { period, entries });
        }

        let symptom = symptom_fragment(&query);
        let count = self.store.count_appointments_with_symptom(doctor_id, &symptom).await?;
        debug!("Symptom report for '{}': {}", symptom, count);

        Ok(Report::SymptomCount { symptom, count })
    }

    /// Summary flattened to a reply for chat and dashboard callers.
    pub async fn summary_message(&self, query: &str, doctor_name: Option<&str>) -> String {
        match self.summarize(query, doctor_name).await {
            Ok(report) => report.to_string(),
            Err(e) => Self::failure_message(&e),
        }
    }

    pub fn failure_message(err: &AppointmentError) -> String {
        error!("Summary failed: {}", err);
        format!("Error generating summary: {}", err)
    }

    /// Summarize, then post the report to the doctor's channel. Delivery is
    /// best-effort and never changes the returned report.
    pub async fn share_report(&self, query: &str, doctor_name: &str) -> Result<Report, AppointmentError> {
        let report = self.summarize(query, Some(doctor_name)).await?;

        if let Report::DoctorNotFound { .. } = report {
            return Ok(report);
        }

        match self.channel.send_channel_report(doctor_name, &report.to_string()).await {
            Ok(true) => info!("Shared report with {}", doctor_name),
            Ok(false) => warn!("Channel did not accept report for {}", doctor_name),
            Err(e) => warn!("Sharing report with {} failed: {}", doctor_name, e),
        }

        Ok(report)
    }
}

/// Remove "for <name>" from a lower-cased query, with or without the title.
fn strip_doctor_phrase(query: &str, doctor_name: &str) -> String {
    let bare = strip_doctor_title(doctor_name).to_lowercase();
    let mut cleaned = query.to_string();

    for phrase in [
        format!("for dr. {}", bare),
        format!("for dr {}", bare),
        format!("for doctor {}", bare),
        format!("for {}", bare),
    ] {
        cleaned = cleaned.replace(&phrase, "");
    }

    cleaned.trim().to_string()
}

fn symptom_fragment(query: &str) -> String {
    query
        .replace(SYMPTOM_QUERY_PREFIX, "")
        .trim()
        .trim_end_matches(['?', '.', '!'])
        .trim()
        .to_string()
}
