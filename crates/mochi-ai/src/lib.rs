//! Streaming chat core for the Mochi desktop pet.
//!
//! Provides an OpenAI-compatible client with:
//! - Streaming (SSE) support, one event per text delta
//! - Tool calling with recoverable tool failures
//! - Single-flight sessions with a bounded transcript
//! - Per-request timeout and clean abort semantics

pub mod config;
pub mod openai;
pub mod session;
pub mod streaming;
pub mod tools;
pub mod transcript;

use async_trait::async_trait;

pub use config::AgentConfig;
pub use openai::OpenAiClient;
pub use session::{ChatSession, EventSink};
pub use tools::{builtin_tools, ToolExecutor};
pub use transcript::Transcript;

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Stream one generation round. `on_delta` is invoked once per text
    /// fragment, in arrival order; the returned response carries the full
    /// accumulated content plus any tool calls the model requested.
    async fn send_message_streaming(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        on_delta: Box<dyn Fn(String) + Send + Sync>,
    ) -> Result<ChatResponse, AiError>;
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

/// One lifecycle event of a chat turn.
///
/// Every `send` produces exactly one `Start`, zero or more `Token`s, and
/// exactly one terminal `End` or `Error`, in that order. Events from two
/// turns never interleave (sessions are single-flight).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StreamEvent {
    Start,
    Token(String),
    End,
    Error(String),
}

impl StreamEvent {
    /// `End` and `Error` terminate a turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::End | StreamEvent::Error(_))
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("session is busy with another request")]
    Busy,
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("request timed out")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_events() {
        assert!(!StreamEvent::Start.is_terminal());
        assert!(!StreamEvent::Token("hi".into()).is_terminal());
        assert!(StreamEvent::End.is_terminal());
        assert!(StreamEvent::Error("boom".into()).is_terminal());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn busy_error_display() {
        assert_eq!(
            AiError::Busy.to_string(),
            "session is busy with another request"
        );
    }
}
