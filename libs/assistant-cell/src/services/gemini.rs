// libs/assistant-cell/src/services/gemini.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use shared_config::AppConfig;

use crate::models::{AssistantError, Content};
use crate::services::tools::tool_declarations;

pub const SYSTEM_INSTRUCTION: &str = "You are a smart and friendly AI assistant for booking doctor appointments. \
Your tools are powerful and can understand natural language dates like \"tomorrow afternoon\" or \"next Friday\". \
Trust the tools and pass the user's conversational input directly to them.

**Workflow for Checking Availability:**
1. When a user asks for a doctor's availability, you MUST use the `get_doctor_schedule` tool.
2. After you receive the list of available times from the tool, you MUST analyze that list yourself to answer \
the user's specific question (e.g., filter for \"afternoon\" slots).

**Booking Rule:**
When calling `book_appointment`, if the user wants 'any' doctor, you MUST use the exact string 'any' for the \
'doctor_name' parameter.";

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Content of the first candidate, or `None` when the model returned none.
    async fn generate(&self, history: &[Content]) -> Result<Option<Content>, AssistantError>;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.external_call_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout ({}), using defaults", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        }
    }

    fn request_body(&self, history: &[Content]) -> Value {
        json!({
            "system_instruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": history,
            "tools": [{ "function_declarations": tool_declarations() }]
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, history: &[Content]) -> Result<Option<Content>, AssistantError> {
        if self.api_key.is_empty() {
            return Err(AssistantError::NotConfigured);
        }

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        debug!("Calling {} with {} turns", url, history.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(history))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Language model error ({}): {}", status, text);
            return Err(classify_failure(status, text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        Ok(parsed.candidates.into_iter().find_map(|candidate| candidate.content))
    }
}

fn classify_failure(status: StatusCode, text: String) -> AssistantError {
    let upstream_status = serde_json::from_str::<Value>(&text).ok().and_then(|body| {
        body.pointer("/error/status")
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    if status == StatusCode::TOO_MANY_REQUESTS || upstream_status.as_deref() == Some("RESOURCE_EXHAUSTED") {
        return AssistantError::RateLimited(text);
    }

    AssistantError::Upstream {
        status: status.as_u16(),
        message: text,
    }
}
