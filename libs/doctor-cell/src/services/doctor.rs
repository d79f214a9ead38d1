use std::sync::Arc;

use tracing::{debug, error};

use shared_database::ClinicStore;
use shared_models::{Doctor, DoctorSummary};
use shared_utils::strip_doctor_title;

use crate::models::DoctorError;

pub struct DoctorService {
    store: Arc<dyn ClinicStore>,
}

impl DoctorService {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    /// All doctors in storage order.
    pub async fn list_doctors(&self) -> Result<Vec<DoctorSummary>, DoctorError> {
        let doctors = self.store.list_doctors().await?;
        debug!("Listing {} doctors", doctors.len());
        Ok(doctors.iter().map(DoctorSummary::from).collect())
    }

    /// Human-readable directory listing.
    pub async fn directory_message(&self) -> String {
        match self.list_doctors().await {
            Ok(doctors) if doctors.is_empty() => "There are no doctors available.".to_string(),
            Ok(doctors) => {
                let lines: Vec<String> = doctors
                    .iter()
                    .map(|d| format!("- {} ({})", d.name, d.specialization))
                    .collect();
                format!("Here are the available doctors:\n{}", lines.join("\n"))
            }
            Err(e) => {
                error!("Failed to list doctors: {}", e);
                format!("Error listing doctors: {}", e)
            }
        }
    }

    /// Fuzzy lookup: the title is dropped, then the first doctor whose name
    /// contains the rest (case-insensitive) wins.
    pub async fn find_by_name(&self, query: &str) -> Result<Doctor, DoctorError> {
        let fragment = strip_doctor_title(query);
        debug!("Resolving doctor '{}' as fragment '{}'", query, fragment);

        self.store
            .find_doctor_by_name(fragment)
            .await?
            .ok_or_else(|| DoctorError::NotFound(query.to_string()))
    }
}
