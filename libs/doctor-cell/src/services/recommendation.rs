use std::sync::Arc;

use tracing::debug;

use shared_database::ClinicStore;

use crate::models::{DoctorError, Recommendation};

/// Symptom keywords in match order; the first one found wins.
const SYMPTOM_SPECIALIZATIONS: [(&str, &str); 9] = [
    ("fever", "General Physician"),
    ("cough", "General Physician"),
    ("headache", "General Physician"),
    ("skin", "Dermatologist"),
    ("rash", "Dermatologist"),
    ("heart", "Cardiologist"),
    ("chest pain", "Cardiologist"),
    ("child", "Pediatrician"),
    ("kid", "Pediatrician"),
];

pub struct RecommendationService {
    store: Arc<dyn ClinicStore>,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    pub fn specialization_for(symptom_text: &str) -> Option<&'static str> {
        let lowered = symptom_text.to_lowercase();
        SYMPTOM_SPECIALIZATIONS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, specialization)| *specialization)
    }

    pub async fn recommend(&self, symptom_text: &str) -> Result<Recommendation, DoctorError> {
        let Some(specialization) = Self::specialization_for(symptom_text) else {
            return Ok(Recommendation::NoMatch);
        };

        let registered = self.store.find_doctor_by_specialization(specialization).await?;
        debug!(
            "Symptom '{}' maps to {} (registered: {})",
            symptom_text,
            specialization,
            registered.is_some()
        );

        Ok(match registered {
            Some(_) => Recommendation::Recommended(specialization.to_string()),
            None => Recommendation::Unavailable(specialization.to_string()),
        })
    }

    pub async fn recommend_message(&self, symptom_text: &str) -> String {
        match self.recommend(symptom_text).await {
            Ok(recommendation) => recommendation.to_string(),
            Err(e) => format!("Error finding a doctor for that symptom: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_keyword_in_table_order_wins() {
        assert_eq!(
            RecommendationService::specialization_for("My kid has a fever"),
            Some("General Physician")
        );
        assert_eq!(
            RecommendationService::specialization_for("itchy RASH on arm"),
            Some("Dermatologist")
        );
        assert_eq!(
            RecommendationService::specialization_for("sharp chest pain"),
            Some("Cardiologist")
        );
        assert_eq!(RecommendationService::specialization_for("sprained ankle"), None);
    }
}
