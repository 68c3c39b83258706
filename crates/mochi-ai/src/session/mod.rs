//! Streaming chat session.
//!
//! A `ChatSession` holds the bounded transcript and drives one generation
//! call at a time, emitting an ordered `StreamEvent` sequence per turn.

mod chat;
mod manager;
mod types;

pub use manager::{ChatSession, DEFAULT_SYSTEM_PROMPT};
pub use types::EventSink;
