// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, warn};

use doctor_cell::{DoctorError, DoctorService};
use notification_cell::{CalendarEvent, CalendarScheduler, EmailNotifier};
use shared_database::{ClinicStore, StoreError};
use shared_models::{Doctor, NewAppointment, NewPatient, Patient, DATE_KEY_FORMAT, SLOT_LABEL_FORMAT};
use shared_utils::{is_any_doctor_selector, normalize_date_from, normalize_time};

use crate::models::{AppointmentCellState, AppointmentError, BookingOutcome, BookingRequest};
use crate::services::conflict::ConflictDetectionService;

pub struct BookingService {
    store: Arc<dyn ClinicStore>,
    calendar: Arc<dyn CalendarScheduler>,
    email: Arc<dyn EmailNotifier>,
    doctors: DoctorService,
    conflicts: ConflictDetectionService,
}

impl BookingService {
    pub fn new(
        store: Arc<dyn ClinicStore>,
        calendar: Arc<dyn CalendarScheduler>,
        email: Arc<dyn EmailNotifier>,
    ) -> Self {
        Self {
            doctors: DoctorService::new(Arc::clone(&store)),
            conflicts: ConflictDetectionService::new(Arc::clone(&store)),
            store,
            calendar,
            email,
        }
    }

    pub fn from_state(state: &AppointmentCellState) -> Self {
        Self::new(
            Arc::clone(&state.store),
            Arc::clone(&state.calendar),
            Arc::clone(&state.email),
        )
    }

    pub async fn book(&self, request: &BookingRequest) -> Result<BookingOutcome, AppointmentError> {
        self.book_on(request, Local::now().date_naive()).await
    }

    /// Book with relative dates resolved against `today`.
    ///
    /// The calendar event is created before the appointment row; when the
    /// insert loses a race for the slot the event is released again.
    pub async fn book_on(
        &self,
        request: &BookingRequest,
        today: NaiveDate,
    ) -> Result<BookingOutcome, AppointmentError> {
        let time = match normalize_time(&request.time) {
            Ok(time) => time,
            Err(e) => return Ok(BookingOutcome::DateTimeUnrecognized(e)),
        };
        let date = match normalize_date_from(&request.date, today) {
            Ok(date) => date,
            Err(e) => return Ok(BookingOutcome::DateTimeUnrecognized(e)),
        };
        let label = time.format(SLOT_LABEL_FORMAT).to_string();
        let at = date.and_time(time);

        debug!("Booking '{}' on {} at {} for {}", request.doctor_name, date, label, request.email);

        let doctor = if is_any_doctor_selector(&request.doctor_name) {
            let doctors = self.store.list_doctors().await?;
            match self.conflicts.first_available(&doctors, date, time).await? {
                Some(doctor) => doctor,
                None => return Ok(BookingOutcome::NoDoctorAvailable { date, time: label }),
            }
        } else {
            let doctor = match self.doctors.find_by_name(&request.doctor_name).await {
                Ok(doctor) => doctor,
                Err(DoctorError::NotFound(query)) => return Ok(BookingOutcome::DoctorNotFound { query }),
                Err(e) => return Err(e.into()),
            };
            // Named bookings skip the template check.
            if self.conflicts.is_booked(doctor.id, at).await? {
                return Ok(slot_conflict(&doctor, date, label));
            }
            doctor
        };

        let patient = self.resolve_patient(&request.email, request.symptoms.as_deref()).await?;

        let event = match self.calendar.schedule(&doctor.name, &patient.email, at).await {
            Ok(event) if event.success => event,
            Ok(_) => {
                warn!("Calendar declined event for {} at {}", doctor.name, at);
                return Ok(BookingOutcome::CalendarSchedulingFailed);
            }
            Err(e) => {
                error!("Calendar scheduling failed: {}", e);
                return Ok(BookingOutcome::CalendarSchedulingFailed);
            }
        };

        let appointment = match self
            .store
            .insert_appointment(NewAppointment::booked(doctor.id, patient.id, at))
            .await
        {
            Ok(appointment) => appointment,
            Err(StoreError::Conflict(detail)) => {
                warn!("Lost race for doctor {} at {}: {}", doctor.id, at, detail);
                self.release_event(&event).await;
                return Ok(slot_conflict(&doctor, date, label));
            }
            Err(e) => {
                self.release_event(&event).await;
                return Err(e.into());
            }
        };

        self.send_confirmation(&doctor, &patient, date, &label).await;

        info!(
            "Appointment {} booked: doctor {} patient {} at {}",
            appointment.id, doctor.id, patient.id, at
        );

        Ok(BookingOutcome::Success {
            appointment_id: appointment.id,
            doctor_name: doctor.name,
            date,
            time: label,
        })
    }

    /// Booking flattened to a reply for chat and form callers.
    pub async fn book_message(&self, request: &BookingRequest) -> String {
        match self.book(request).await {
            Ok(outcome) => outcome.to_string(),
            Err(e) => Self::failure_message(&e),
        }
    }

    /// Reply text for a booking that failed below the outcome level.
    pub fn failure_message(err: &AppointmentError) -> String {
        error!("Booking failed: {}", err);
        format!("Error booking appointment: {}", err)
    }

    async fn resolve_patient(&self, email: &str, symptoms: Option<&str>) -> Result<Patient, AppointmentError> {
        if let Some(patient) = self.store.find_patient_by_email(email).await? {
            return Ok(patient);
        }

        match self.store.insert_patient(NewPatient::from_email(email, symptoms)).await {
            Ok(patient) => {
                debug!("Registered patient {} as {}", patient.id, email);
                Ok(patient)
            }
            Err(StoreError::Conflict(_)) => self
                .store
                .find_patient_by_email(email)
                .await?
                .ok_or_else(|| AppointmentError::Database(format!("patient {} missing after conflict", email))),
            Err(e) => Err(e.into()),
        }
    }

    async fn release_event(&self, event: &CalendarEvent) {
        let Some(event_id) = event.event_id.as_deref() else {
            return;
        };
        if let Err(e) = self.calendar.release(event_id).await {
            warn!("Failed to release calendar event {}: {}", event_id, e);
        }
    }

    async fn send_confirmation(&self, doctor: &Doctor, patient: &Patient, date: NaiveDate, label: &str) {
        let body = format!(
            "Your appointment with {} is confirmed for {} at {}.",
            doctor.name,
            date.format(DATE_KEY_FORMAT),
            label
        );

        match self.email.send_confirmation(&patient.email, "Appointment Confirmed", &body).await {
            Ok(true) => debug!("Confirmation sent to {}", patient.email),
            Ok(false) => warn!("Confirmation to {} was not delivered", patient.email),
            Err(e) => warn!("Confirmation to {} failed: {}", patient.email, e),
        }
    }
}

fn slot_conflict(doctor: &Doctor, date: NaiveDate, time: String) -> BookingOutcome {
    BookingOutcome::SlotConflict {
        doctor_name: doctor.name.clone(),
        date,
        time,
    }
}
