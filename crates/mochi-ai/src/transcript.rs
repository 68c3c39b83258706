//! Bounded conversation history.

use std::collections::VecDeque;

use crate::Message;

pub const DEFAULT_CAP: usize = 20;

/// Ordered message history, oldest first, capped at a fixed length.
///
/// The system prompt is never stored here; it is injected fresh on every
/// request. All mutation happens on the single logical thread driving the
/// session, so no locking is needed.
#[derive(Debug)]
pub struct Transcript {
    messages: VecDeque<Message>,
    cap: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_CAP)
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Append a message, evicting from the front once over the cap.
    /// Relative order of survivors is preserved.
    pub fn append(&mut self, message: Message) {
        self.messages.push_back(message);
        while self.messages.len() > self.cap {
            self.messages.pop_front();
        }
    }

    /// Owned copy of the current history, safe to hold across later appends.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    /// Empty the history. No effect on an in-flight request.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
