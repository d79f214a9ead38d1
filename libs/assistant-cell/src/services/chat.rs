// libs/assistant-cell/src/services/chat.rs
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::models::{AssistantError, Content, Part};
use crate::services::gemini::LanguageModel;
use crate::services::session::SessionStore;
use crate::services::tools::{ToolCall, ToolRouter};

pub const NO_RESPONSE_REPLY: &str =
    "I'm sorry, I couldn't generate a response. The request may have been blocked. Please try rephrasing your message.";
pub const NO_TOOL_FOLLOW_UP_REPLY: &str =
    "I'm sorry, I received a result from the tool but couldn't process it. Please try again.";
pub const RATE_LIMITED_REPLY: &str = "I'm experiencing high traffic right now. Please wait a minute and try again.";
pub const NOT_CONFIGURED_REPLY: &str = "The assistant is not available right now. Please use the booking form instead.";
pub const UNEXPECTED_ERROR_REPLY: &str = "An unexpected server error occurred.";

/// One conversation turn: the model may answer directly or call a single
/// tool whose result it then turns into the reply.
pub struct ChatService {
    model: Arc<dyn LanguageModel>,
    tools: Arc<ToolRouter>,
    sessions: Arc<SessionStore>,
}

impl ChatService {
    pub fn new(model: Arc<dyn LanguageModel>, tools: Arc<ToolRouter>, sessions: Arc<SessionStore>) -> Self {
        Self { model, tools, sessions }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Always produces a reply; failures become apologies.
    pub async fn reply(&self, session_id: &str, message: &str) -> String {
        match self.converse(session_id, message).await {
            Ok(reply) => reply,
            Err(AssistantError::RateLimited(detail)) => {
                warn!("Language model rate limited: {}", detail);
                RATE_LIMITED_REPLY.to_string()
            }
            Err(AssistantError::NotConfigured) => NOT_CONFIGURED_REPLY.to_string(),
            Err(e) => {
                error!("Chat turn failed for session {}: {}", session_id, e);
                UNEXPECTED_ERROR_REPLY.to_string()
            }
        }
    }

    async fn converse(&self, session_id: &str, message: &str) -> Result<String, AssistantError> {
        let mut history = self.sessions.append(session_id, Content::user_text(message)).await;

        let Some(part) = self.next_part(&history).await? else {
            return Ok(NO_RESPONSE_REPLY.to_string());
        };
        self.record(session_id, &mut history, Content::model(part.clone())).await;

        let Some(function_call) = part.function_call else {
            return Ok(part
                .text
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| NO_RESPONSE_REPLY.to_string()));
        };

        let call = match ToolCall::from_function_call(&function_call) {
            Ok(call) => call,
            Err(AssistantError::UnknownTool(name)) => {
                warn!("Model requested unknown tool {}", name);
                return Ok(format!(
                    "Error: The model tried to call a function named '{}' which is not available.",
                    name
                ));
            }
            Err(e) => return Err(e),
        };

        let result = self.tools.dispatch(&call).await;
        self.record(session_id, &mut history, Content::function_response(call.name(), result))
            .await;

        let Some(follow_up) = self.next_part(&history).await? else {
            return Ok(NO_TOOL_FOLLOW_UP_REPLY.to_string());
        };
        self.record(session_id, &mut history, Content::model(follow_up.clone())).await;

        info!("Session {} completed tool turn {}", session_id, call.name());
        Ok(follow_up
            .text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| NO_TOOL_FOLLOW_UP_REPLY.to_string()))
    }

    async fn next_part(&self, history: &[Content]) -> Result<Option<Part>, AssistantError> {
        let content = self.model.generate(history).await?;
        Ok(content.and_then(|content| content.parts.into_iter().next()))
    }

    async fn record(&self, session_id: &str, history: &mut Vec<Content>, content: Content) {
        debug!("Session {} += {} turn", session_id, content.role);
        history.push(content.clone());
        self.sessions.append(session_id, content).await;
    }
}
