// libs/shared/database/src/memory.rs
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::RwLock;
use tracing::debug;

use shared_models::{
    Appointment, AppointmentStatus, Doctor, NewAppointment, NewDoctor, NewPatient, Patient,
};

use crate::store::{AppointmentFilter, ClinicStore, StoreError};

#[derive(Default)]
struct Tables {
    doctors: Vec<Doctor>,
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
    next_doctor_id: i64,
    next_patient_id: i64,
    next_appointment_id: i64,
}

/// Process-local store. Rows live in insertion order, which is also id order.
#[derive(Default)]
pub struct InMemoryClinicStore {
    tables: RwLock<Tables>,
}

impl InMemoryClinicStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl ClinicStore for InMemoryClinicStore {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        Ok(self.tables.read().await.doctors.clone())
    }

    async fn find_doctor_by_name(&self, fragment: &str) -> Result<Option<Doctor>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .doctors
            .iter()
            .find(|doctor| contains_ignore_case(&doctor.name, fragment))
            .cloned())
    }

    async fn find_doctor_by_specialization(&self, specialization: &str) -> Result<Option<Doctor>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .doctors
            .iter()
            .find(|doctor| doctor.specialization == specialization)
            .cloned())
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        let mut tables = self.tables.write().await;
        tables.next_doctor_id += 1;

        let doctor = Doctor {
            id: tables.next_doctor_id,
            name: doctor.name,
            specialization: doctor.specialization,
            availability: doctor.availability,
        };
        tables.doctors.push(doctor.clone());
        Ok(doctor)
    }

    async fn find_patient(&self, patient_id: i64) -> Result<Option<Patient>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.patients.iter().find(|p| p.id == patient_id).cloned())
    }

    async fn find_patient_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.patients.iter().find(|p| p.email == email).cloned())
    }

    async fn insert_patient(&self, patient: NewPatient) -> Result<Patient, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.patients.iter().any(|p| p.email == patient.email) {
            return Err(StoreError::Conflict(format!(
                "patient with email {} already exists",
                patient.email
            )));
        }

        tables.next_patient_id += 1;
        let patient = Patient {
            id: tables.next_patient_id,
            name: patient.name,
            email: patient.email,
            symptoms: patient.symptoms,
        };
        tables.patients.push(patient.clone());
        Ok(patient)
    }

    async fn find_booked_appointment(
        &self,
        doctor_id: i64,
        at: NaiveDateTime,
    ) -> Result<Option<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .appointments
            .iter()
            .find(|a| {
                a.doctor_id == doctor_id && a.appointment_time == at && a.status == AppointmentStatus::Booked
            })
            .cloned())
    }

    async fn appointments_between(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        let mut matched: Vec<Appointment> = tables
            .appointments
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        matched.sort_by_key(|a| (a.appointment_time, a.id));
        Ok(matched)
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.write().await;

        let slot_taken = appointment.status == AppointmentStatus::Booked
            && tables.appointments.iter().any(|a| {
                a.doctor_id == appointment.doctor_id
                    && a.appointment_time == appointment.appointment_time
                    && a.status == AppointmentStatus::Booked
            });
        if slot_taken {
            debug!(
                "Rejecting duplicate booking for doctor {} at {}",
                appointment.doctor_id, appointment.appointment_time
            );
            return Err(StoreError::Conflict(format!(
                "doctor {} already booked at {}",
                appointment.doctor_id, appointment.appointment_time
            )));
        }

        tables.next_appointment_id += 1;
        let appointment = Appointment {
            id: tables.next_appointment_id,
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            appointment_time: appointment.appointment_time,
            status: appointment.status,
        };
        tables.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn count_appointments_with_symptom(
        &self,
        doctor_id: Option<i64>,
        fragment: &str,
    ) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;

        let count = tables
            .appointments
            .iter()
            .filter(|a| doctor_id.map_or(true, |id| a.doctor_id == id))
            .filter(|a| {
                tables
                    .patients
                    .iter()
                    .find(|p| p.id == a.patient_id)
                    .and_then(|p| p.symptoms.as_deref())
                    .is_some_and(|symptoms| contains_ignore_case(symptoms, fragment))
            })
            .count();

        Ok(count as u64)
    }
}
