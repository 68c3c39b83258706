//! Floating reply bubble state machine.
//!
//! Consumes boundary messages and tracks what the bubble shows and when it
//! hides. The hide deadline is an explicit value owned by the presenter
//! and re-examined on every transition, so a superseded timer can never
//! fire after a state change.

use std::time::{Duration, Instant};

use crate::gateway::WireMessage;

pub const HIDE_DELAY: Duration = Duration::from_secs(5);
pub const THINKING_PLACEHOLDER: &str = "thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleState {
    Hidden,
    Thinking,
    Streaming,
    Visible,
}

pub struct BubblePresenter {
    state: BubbleState,
    /// Concatenation of deltas since the most recent stream start, or the
    /// error/persistent message alone.
    text: String,
    /// When to hide; `None` while streaming or for persistent messages.
    hide_at: Option<Instant>,
    hide_delay: Duration,
}

impl BubblePresenter {
    pub fn new() -> Self {
        Self::with_hide_delay(HIDE_DELAY)
    }

    pub fn with_hide_delay(hide_delay: Duration) -> Self {
        Self {
            state: BubbleState::Hidden,
            text: String::new(),
            hide_at: None,
            hide_delay,
        }
    }

    pub fn state(&self) -> BubbleState {
        self.state
    }

    /// What the bubble currently renders.
    pub fn display_text(&self) -> &str {
        match self.state {
            BubbleState::Thinking => THINKING_PLACEHOLDER,
            _ => &self.text,
        }
    }

    /// Apply one boundary message.
    pub fn handle(&mut self, message: &WireMessage, now: Instant) {
        match message {
            WireMessage::AiStreamStart => {
                // A new turn supersedes anything pending, including a
                // mid-timer Visible bubble.
                self.state = BubbleState::Thinking;
                self.text.clear();
                self.hide_at = None;
            }
            WireMessage::AiStreamToken { token } => {
                if matches!(self.state, BubbleState::Thinking | BubbleState::Streaming) {
                    self.state = BubbleState::Streaming;
                    self.text.push_str(token);
                    self.hide_at = None;
                }
            }
            WireMessage::AiStreamEnd => {
                if matches!(self.state, BubbleState::Thinking | BubbleState::Streaming) {
                    self.state = BubbleState::Visible;
                    self.hide_at = Some(now + self.hide_delay);
                }
            }
            WireMessage::AiError { message } => {
                self.state = BubbleState::Visible;
                self.text = format!("Error: {message}");
                self.hide_at = Some(now + self.hide_delay);
            }
            WireMessage::UserMessage { .. } => {}
        }
    }

    /// Show a message that never auto-hides (configuration-level failures,
    /// where retry requires external action).
    pub fn show_persistent(&mut self, message: impl Into<String>) {
        self.state = BubbleState::Visible;
        self.text = message.into();
        self.hide_at = None;
    }

    /// Advance the clock; hides the bubble once its deadline has passed.
    pub fn poll(&mut self, now: Instant) {
        if let Some(deadline) = self.hide_at {
            if now >= deadline {
                self.state = BubbleState::Hidden;
                self.text.clear();
                self.hide_at = None;
            }
        }
    }

    /// Next instant at which `poll` could change state, if any.
    pub fn hide_deadline(&self) -> Option<Instant> {
        self.hide_at
    }
}

impl Default for BubblePresenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str) -> WireMessage {
        WireMessage::AiStreamToken { token: text.into() }
    }

    #[test]
    fn streams_accumulate_then_hide_after_delay() {
        let mut bubble = BubblePresenter::new();
        let t0 = Instant::now();
        assert_eq!(bubble.state(), BubbleState::Hidden);

        bubble.handle(&WireMessage::AiStreamStart, t0);
        assert_eq!(bubble.state(), BubbleState::Thinking);
        assert_eq!(bubble.display_text(), THINKING_PLACEHOLDER);

        bubble.handle(&token("hel"), t0);
        assert_eq!(bubble.state(), BubbleState::Streaming);
        bubble.handle(&token("lo"), t0);
        assert_eq!(bubble.state(), BubbleState::Streaming);
        assert_eq!(bubble.display_text(), "hello");

        bubble.handle(&WireMessage::AiStreamEnd, t0);
        assert_eq!(bubble.state(), BubbleState::Visible);
        assert_eq!(bubble.display_text(), "hello");

        // Still visible just before the deadline, hidden at it.
        bubble.poll(t0 + HIDE_DELAY - Duration::from_millis(1));
        assert_eq!(bubble.state(), BubbleState::Visible);
        bubble.poll(t0 + HIDE_DELAY);
        assert_eq!(bubble.state(), BubbleState::Hidden);
        assert_eq!(bubble.display_text(), "");
    }

    #[test]
    fn no_hide_mid_stream() {
        let mut bubble = BubblePresenter::new();
        let t0 = Instant::now();

        bubble.handle(&WireMessage::AiStreamStart, t0);
        bubble.handle(&token("a"), t0);
        // No deadline is armed while streaming.
        assert!(bubble.hide_deadline().is_none());
        bubble.poll(t0 + Duration::from_secs(3600));
        assert_eq!(bubble.state(), BubbleState::Streaming);
        assert_eq!(bubble.display_text(), "a");
    }

    #[test]
    fn new_start_cancels_pending_hide_and_clears_text() {
        let mut bubble = BubblePresenter::new();
        let t0 = Instant::now();

        bubble.handle(&WireMessage::AiStreamStart, t0);
        bubble.handle(&token("first"), t0);
        bubble.handle(&WireMessage::AiStreamEnd, t0);
        assert!(bubble.hide_deadline().is_some());

        // Mid-timer, a new turn begins.
        bubble.handle(&WireMessage::AiStreamStart, t0 + Duration::from_secs(2));
        assert_eq!(bubble.state(), BubbleState::Thinking);
        assert!(bubble.hide_deadline().is_none());

        // The old deadline must not fire.
        bubble.poll(t0 + HIDE_DELAY);
        assert_eq!(bubble.state(), BubbleState::Thinking);

        bubble.handle(&token("second"), t0 + Duration::from_secs(3));
        assert_eq!(bubble.display_text(), "second");
    }

    #[test]
    fn error_shows_message_alone_with_auto_hide() {
        let mut bubble = BubblePresenter::new();
        let t0 = Instant::now();

        bubble.handle(&WireMessage::AiStreamStart, t0);
        bubble.handle(&token("par"), t0);
        bubble.handle(
            &WireMessage::AiError {
                message: "connection reset".into(),
            },
            t0,
        );
        assert_eq!(bubble.state(), BubbleState::Visible);
        assert_eq!(bubble.display_text(), "Error: connection reset");

        bubble.poll(t0 + HIDE_DELAY);
        assert_eq!(bubble.state(), BubbleState::Hidden);
    }

    #[test]
    fn persistent_message_survives_polling() {
        let mut bubble = BubblePresenter::new();
        let t0 = Instant::now();

        bubble.show_persistent("missing API key");
        bubble.poll(t0 + Duration::from_secs(3600));
        assert_eq!(bubble.state(), BubbleState::Visible);
        assert_eq!(bubble.display_text(), "missing API key");

        // A later turn still takes over normally.
        bubble.handle(&WireMessage::AiStreamStart, t0);
        assert_eq!(bubble.state(), BubbleState::Thinking);
    }

    #[test]
    fn stray_tokens_outside_a_stream_are_ignored() {
        let mut bubble = BubblePresenter::new();
        let t0 = Instant::now();

        bubble.handle(&token("ghost"), t0);
        assert_eq!(bubble.state(), BubbleState::Hidden);
        assert_eq!(bubble.display_text(), "");

        bubble.handle(&WireMessage::AiStreamEnd, t0);
        assert_eq!(bubble.state(), BubbleState::Hidden);
    }
}
