//! Session struct and transcript management.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::tools::ToolExecutor;
use crate::transcript::Transcript;
use crate::{Message, ToolDefinition};

/// Persona prompt for the desktop pet. Injected fresh on every request,
/// never stored in the transcript.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a cute desktop pet AI assistant. \
Keep replies short and friendly, with a playful tone and a bit of personality. \
Stay under 50 words unless the user explicitly asks for a detailed answer.";

/// A chat session: bounded transcript plus the state needed to drive one
/// streaming turn at a time.
///
/// Configuration is immutable for the session's lifetime; to reconfigure,
/// build a new client and a new session via [`ChatSession::resume`] so the
/// transcript survives while any in-flight call state is discarded.
pub struct ChatSession {
    /// Conversation history, capped FIFO.
    pub(super) transcript: Transcript,
    /// System prompt (prepended to every API call).
    pub(super) system_prompt: String,
    /// Tool definitions offered to the model.
    pub(super) tools: Vec<ToolDefinition>,
    /// Tool executor callback.
    pub(super) tool_executor: Option<ToolExecutor>,
    /// Maximum tool-call loop iterations to prevent infinite loops.
    pub(super) max_tool_rounds: u32,
    /// Wall-clock cap per request.
    pub(super) request_timeout: Duration,
    /// Whether a turn is currently in flight.
    pub(super) busy: AtomicBool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::resume(Transcript::new())
    }

    /// Build a session around an existing transcript. This is the
    /// reconfiguration path: a new session keeps the history while any
    /// previous in-flight state is gone with the old session value.
    pub fn resume(transcript: Transcript) -> Self {
        Self {
            transcript,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            tools: Vec::new(),
            tool_executor: None,
            max_tool_rounds: 10,
            request_timeout: Duration::from_secs(120),
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool_executor(mut self, executor: ToolExecutor) -> Self {
        self.tool_executor = Some(executor);
        self
    }

    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.max_tool_rounds = max;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// System prompt + full transcript snapshot, in request order.
    pub(super) fn build_messages(&self) -> Vec<Message> {
        let mut msgs = Vec::with_capacity(self.transcript.len() + 1);
        msgs.push(Message::system(self.system_prompt.clone()));
        msgs.extend(self.transcript.snapshot());
        msgs
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Tear down the session, keeping the history for a successor.
    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }

    /// Clear conversation history. No effect on an in-flight turn.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_messages_injects_system_prompt() {
        let mut session = ChatSession::new().with_system_prompt("be terse");
        session.transcript.append(Message::user("hi"));

        let msgs = session.build_messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, crate::Role::System);
        assert_eq!(msgs[0].content, "be terse");
        assert_eq!(msgs[1].content, "hi");

        // Transcript itself never holds the system prompt.
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn resume_keeps_history() {
        let mut session = ChatSession::new();
        session.transcript.append(Message::user("remember me"));

        let resumed = ChatSession::resume(session.into_transcript());
        assert_eq!(resumed.transcript().len(), 1);
        assert_eq!(resumed.transcript().last().unwrap().content, "remember me");
    }
}
