// libs/appointment-cell/src/services/conflict.rs
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use shared_database::{ClinicStore, StoreError};
use shared_models::{Doctor, SLOT_LABEL_FORMAT};

/// Read-side slot checks. The store's uniqueness rule is the final word;
/// these only avoid calling collaborators for slots known to be taken.
pub struct ConflictDetectionService {
    store: Arc<dyn ClinicStore>,
}

impl ConflictDetectionService {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    /// Whether a `booked` appointment holds the doctor at exactly `at`.
    pub async fn is_booked(&self, doctor_id: i64, at: NaiveDateTime) -> Result<bool, StoreError> {
        let existing = self.store.find_booked_appointment(doctor_id, at).await?;
        if let Some(appointment) = &existing {
            debug!(
                "Doctor {} already holds appointment {} at {}",
                doctor_id, appointment.id, at
            );
        }
        Ok(existing.is_some())
    }

    /// First doctor, in the given order, that declares `time` on `date` and
    /// is not booked then.
    pub async fn first_available(
        &self,
        doctors: &[Doctor],
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Option<Doctor>, StoreError> {
        let label = time.format(SLOT_LABEL_FORMAT).to_string();
        let at = date.and_time(time);

        for doctor in doctors {
            if !doctor.availability.offers(date, &label) {
                continue;
            }
            if !self.is_booked(doctor.id, at).await? {
                return Ok(Some(doctor.clone()));
            }
        }

        debug!("No doctor free on {} at {}", date, label);
        Ok(None)
    }
}
