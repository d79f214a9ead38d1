pub mod chat;
pub mod gemini;
pub mod session;
pub mod tools;

pub use chat::ChatService;
pub use gemini::{GeminiClient, LanguageModel};
pub use session::SessionStore;
pub use tools::{tool_declarations, tool_manifest, ToolCall, ToolRouter};
