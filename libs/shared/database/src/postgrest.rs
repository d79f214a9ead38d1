// libs/shared/database/src/postgrest.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::{Appointment, Doctor, NewAppointment, NewDoctor, NewPatient, Patient};

use crate::store::{AppointmentFilter, ClinicStore, StoreError};
use crate::supabase::SupabaseClient;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// [`ClinicStore`] backed by Supabase's PostgREST interface.
///
/// Uniqueness is enforced by the database indexes in
/// `migrations/0001_clinic_schema.sql`; violations come back as 409 /
/// `23505` and surface as [`StoreError::Conflict`].
pub struct SupabaseClinicStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseClinicStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, StoreError> {
        Ok(self.supabase.request(Method::GET, path, None).await?)
    }

    async fn fetch_first<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, StoreError> {
        Ok(self.fetch(path).await?.into_iter().next())
    }

    async fn insert_one<T: DeserializeOwned>(&self, table: &str, body: Value) -> Result<T, StoreError> {
        let path = format!("/rest/v1/{}", table);
        let rows: Vec<T> = self.supabase.insert(&path, body).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Malformed(format!("insert into {} returned no rows", table)))
    }
}

fn ilike(fragment: &str) -> String {
    format!("ilike.*{}*", urlencoding::encode(fragment))
}

fn timestamp(at: NaiveDateTime) -> String {
    urlencoding::encode(&at.format(TIMESTAMP_FORMAT).to_string()).into_owned()
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Malformed(e.to_string()))
}

#[async_trait]
impl ClinicStore for SupabaseClinicStore {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        self.fetch("/rest/v1/doctors?order=id.asc").await
    }

    async fn find_doctor_by_name(&self, fragment: &str) -> Result<Option<Doctor>, StoreError> {
        let path = format!("/rest/v1/doctors?name={}&order=id.asc&limit=1", ilike(fragment));
        self.fetch_first(&path).await
    }

    async fn find_doctor_by_specialization(&self, specialization: &str) -> Result<Option<Doctor>, StoreError> {
        let path = format!(
            "/rest/v1/doctors?specialization=eq.{}&order=id.asc&limit=1",
            urlencoding::encode(specialization)
        );
        self.fetch_first(&path).await
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        self.insert_one("doctors", to_body(&doctor)?).await
    }

    async fn find_patient(&self, patient_id: i64) -> Result<Option<Patient>, StoreError> {
        self.fetch_first(&format!("/rest/v1/patients?id=eq.{}", patient_id)).await
    }

    async fn find_patient_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError> {
        let path = format!("/rest/v1/patients?email=eq.{}&limit=1", urlencoding::encode(email));
        self.fetch_first(&path).await
    }

    async fn insert_patient(&self, patient: NewPatient) -> Result<Patient, StoreError> {
        self.insert_one("patients", to_body(&patient)?).await
    }

    async fn find_booked_appointment(
        &self,
        doctor_id: i64,
        at: NaiveDateTime,
    ) -> Result<Option<Appointment>, StoreError> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&appointment_time=eq.{}&status=eq.booked&limit=1",
            doctor_id,
            timestamp(at)
        );
        self.fetch_first(&path).await
    }

    async fn appointments_between(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, StoreError> {
        let mut query_parts = vec![
            format!("appointment_time=gte.{}", timestamp(filter.from)),
            format!("appointment_time=lt.{}", timestamp(filter.to)),
        ];

        if let Some(doctor_id) = filter.doctor_id {
            query_parts.push(format!("doctor_id=eq.{}", doctor_id));
        }
        if let Some(status) = filter.status {
            query_parts.push(format!("status=eq.{}", status));
        }
        query_parts.push("order=appointment_time.asc,id.asc".to_string());

        let path = format!("/rest/v1/appointments?{}", query_parts.join("&"));
        debug!("Fetching appointments with path: {}", path);
        self.fetch(&path).await
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        self.insert_one("appointments", to_body(&appointment)?).await
    }

    async fn count_appointments_with_symptom(
        &self,
        doctor_id: Option<i64>,
        fragment: &str,
    ) -> Result<u64, StoreError> {
        let mut path = format!(
            "/rest/v1/appointments?select=id,patients!inner(symptoms)&patients.symptoms={}",
            ilike(fragment)
        );
        if let Some(doctor_id) = doctor_id {
            path.push_str(&format!("&doctor_id=eq.{}", doctor_id));
        }

        let rows: Vec<Value> = self.fetch(&path).await?;
        Ok(rows.len() as u64)
    }
}
