//! Boundary relay between the session core and the presentation surface.
//!
//! Messages flow in both directions across the process boundary:
//! - **presentation -> session**: `user-message`
//! - **session -> presentation**: `ai-stream-start`, `ai-stream-token`,
//!   `ai-stream-end`, `ai-error`
//!
//! The gateway is a transparent, order-preserving relay: every
//! `StreamEvent` becomes exactly one wire message, tokens are never
//! batched or coalesced, and nothing is reinterpreted. A detached
//! presentation side is logged once and events are dropped; the session
//! itself never fails because of it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

use mochi_ai::{AiError, ChatClient, ChatSession, StreamEvent};

/// One message on the boundary channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WireMessage {
    UserMessage { text: String },
    AiStreamStart,
    AiStreamToken { token: String },
    AiStreamEnd,
    AiError { message: String },
}

impl From<StreamEvent> for WireMessage {
    fn from(event: StreamEvent) -> Self {
        match event {
            StreamEvent::Start => WireMessage::AiStreamStart,
            StreamEvent::Token(token) => WireMessage::AiStreamToken { token },
            StreamEvent::End => WireMessage::AiStreamEnd,
            StreamEvent::Error(message) => WireMessage::AiError { message },
        }
    }
}

/// Session-side half of the boundary.
pub struct SessionGateway {
    outbound: mpsc::UnboundedSender<WireMessage>,
    detached: Arc<AtomicBool>,
}

impl SessionGateway {
    pub fn new(outbound: mpsc::UnboundedSender<WireMessage>) -> Self {
        Self {
            outbound,
            detached: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Forward one user message into the session and relay every resulting
    /// event to the presentation side as it arrives.
    ///
    /// Only `AiError::Busy` is reported to the caller; every in-turn
    /// failure already travels the boundary as an `ai-error` message.
    pub async fn on_user_input(
        &self,
        session: &mut ChatSession,
        client: &dyn ChatClient,
        text: &str,
    ) -> Result<(), AiError> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let outbound = self.outbound.clone();
        let detached = Arc::clone(&self.detached);
        let forwarder = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if outbound.send(WireMessage::from(event)).is_err()
                    && !detached.swap(true, Ordering::Relaxed)
                {
                    warn!("presentation side detached, dropping stream events");
                }
            }
        });

        let result = session.send(client, text, &tx).await;
        drop(tx);
        // Wait until every event has crossed the boundary so the next turn
        // cannot interleave with this one.
        let _ = forwarder.await;

        if matches!(result, Err(AiError::Busy)) {
            warn!("user input rejected: a previous turn is still in flight");
        }
        result
    }

    /// Parse an inbound boundary message, accepting only `user-message`.
    pub fn parse_user_input(raw: &str) -> Option<String> {
        match serde_json::from_str::<WireMessage>(raw) {
            Ok(WireMessage::UserMessage { text }) => Some(text),
            _ => None,
        }
    }
}
