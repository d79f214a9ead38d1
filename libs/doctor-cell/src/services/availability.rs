// libs/doctor-cell/src/services/availability.rs
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, error};

use shared_database::{AppointmentFilter, ClinicStore};
use shared_models::{AppointmentStatus, Doctor, DoctorSummary};
use shared_utils::normalize_date_from;

use crate::models::{DoctorError, ScheduleOutcome};
use crate::services::doctor::DoctorService;

pub struct AvailabilityService {
    store: Arc<dyn ClinicStore>,
    doctors: DoctorService,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self {
            doctors: DoctorService::new(Arc::clone(&store)),
            store,
        }
    }

    /// Template labels for `date` minus those held by `booked` appointments,
    /// in template order.
    pub async fn free_slots(&self, doctor: &Doctor, date: NaiveDate) -> Result<Vec<String>, DoctorError> {
        let declared = doctor.availability.slots_on(date);
        if declared.is_empty() {
            return Ok(Vec::new());
        }

        let filter = AppointmentFilter::day(date)
            .for_doctor(doctor.id)
            .with_status(AppointmentStatus::Booked);
        let booked: HashSet<String> = self
            .store
            .appointments_between(filter)
            .await?
            .iter()
            .map(|a| a.slot_label())
            .collect();

        debug!(
            "Doctor {} has {} declared and {} booked slots on {}",
            doctor.id,
            declared.len(),
            booked.len(),
            date
        );

        Ok(declared
            .iter()
            .filter(|label| !booked.contains(label.as_str()))
            .cloned()
            .collect())
    }

    pub async fn get_schedule(&self, doctor_name: &str, date_text: &str) -> Result<ScheduleOutcome, DoctorError> {
        self.get_schedule_on(doctor_name, date_text, Local::now().date_naive()).await
    }

    pub async fn get_schedule_on(
        &self,
        doctor_name: &str,
        date_text: &str,
        today: NaiveDate,
    ) -> Result<ScheduleOutcome, DoctorError> {
        let date = match normalize_date_from(date_text, today) {
            Ok(date) => date,
            Err(e) => return Ok(ScheduleOutcome::DateUnrecognized(e)),
        };

        let doctor = match self.doctors.find_by_name(doctor_name).await {
            Ok(doctor) => doctor,
            Err(DoctorError::NotFound(query)) => return Ok(ScheduleOutcome::DoctorNotFound { query }),
            Err(e) => return Err(e),
        };

        if !doctor.availability.has_date(date) {
            return Ok(ScheduleOutcome::NoAvailability {
                doctor: DoctorSummary::from(&doctor),
                date,
            });
        }

        let slots = self.free_slots(&doctor, date).await?;
        Ok(ScheduleOutcome::Slots {
            doctor: DoctorSummary::from(&doctor),
            date,
            slots,
        })
    }

    /// Schedule lookup flattened to a reply for chat and form callers.
    pub async fn schedule_message(&self, doctor_name: &str, date_text: &str) -> String {
        match self.get_schedule(doctor_name, date_text).await {
            Ok(outcome) => outcome.to_string(),
            Err(e) => {
                error!("Schedule lookup failed: {}", e);
                format!("Error fetching schedule: {}", e)
            }
        }
    }
}
