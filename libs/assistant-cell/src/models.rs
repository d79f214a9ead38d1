// libs/assistant-cell/src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::services::chat::ChatService;

pub struct AssistantCellState {
    pub chat: ChatService,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: Option<String>,
}

// ==============================================================================
// MODEL WIRE FORMAT
// ==============================================================================

pub const ROLE_USER: &str = "user";
pub const ROLE_MODEL: &str = "model";

/// One turn of a conversation as the language model API represents it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: ROLE_USER.to_string(),
            parts: vec![Part::text(text)],
        }
    }

    pub fn model(part: Part) -> Self {
        Self {
            role: ROLE_MODEL.to_string(),
            parts: vec![part],
        }
    }

    pub fn function_response(name: impl Into<String>, response: Value) -> Self {
        Self {
            role: ROLE_USER.to_string(),
            parts: vec![Part {
                function_response: Some(FunctionResponse {
                    name: name.into(),
                    response,
                }),
                ..Part::default()
            }],
        }
    }

    /// A turn typed by the user, as opposed to a tool result.
    pub fn is_user_text(&self) -> bool {
        self.role == ROLE_USER && self.parts.iter().any(|part| part.text.is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn call(name: impl Into<String>, args: Value) -> Self {
        Self {
            function_call: Some(FunctionCall {
                name: name.into(),
                args,
            }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Language model is not configured")]
    NotConfigured,

    #[error("Language model rate limit reached: {0}")]
    RateLimited(String),

    #[error("Language model error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Language model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid language model payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {name}: {message}")]
    InvalidArguments { name: String, message: String },
}
