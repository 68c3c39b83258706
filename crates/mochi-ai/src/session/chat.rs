//! The streaming `send` turn.

use tracing::{debug, warn};

use crate::{AiError, ChatClient, Message, Role, StreamEvent};

use super::manager::ChatSession;
use super::types::{BusyGuard, EventSink};

impl ChatSession {
    /// Run one chat turn, emitting `Start, Token*, (End | Error)` into
    /// `events` in strict order.
    ///
    /// Synchronous failures are limited to `AiError::Busy` (a previous
    /// turn has not reached its terminal event). Everything else —
    /// network, endpoint, parse, timeout — surfaces as a terminal
    /// `Error` event, with the transcript left without an assistant
    /// message for the turn.
    ///
    /// Empty or whitespace-only input is ignored: no events, no
    /// transcript mutation.
    ///
    /// Dropping the returned future aborts the underlying call; the busy
    /// flag is released by its guard and the partial accumulator is
    /// discarded, never persisted.
    pub async fn send(
        &mut self,
        client: &dyn ChatClient,
        user_text: &str,
        events: &EventSink,
    ) -> Result<(), AiError> {
        let text = user_text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let _guard = BusyGuard::acquire(&self.busy)?;

        // The user message lands before Start so an observer mirroring the
        // transcript sees it before being told generation has begun.
        self.transcript.append(Message::user(text));
        emit(events, StreamEvent::Start);

        let outcome =
            tokio::time::timeout(self.request_timeout, self.run_generation(client, events)).await;

        match outcome {
            Ok(Ok(full_text)) => {
                if !full_text.is_empty() {
                    self.transcript.append(Message::assistant(full_text));
                }
                emit(events, StreamEvent::End);
            }
            Ok(Err(err)) => {
                warn!(error = %err, "chat turn failed");
                emit(events, StreamEvent::Error(err.to_string()));
            }
            Err(_elapsed) => {
                warn!("chat turn exceeded the request timeout");
                emit(events, StreamEvent::Error(AiError::Timeout.to_string()));
            }
        }
        Ok(())
    }

    /// Drive generation rounds until the model stops calling tools.
    /// Returns the concatenation of every text delta emitted this turn.
    async fn run_generation(
        &self,
        client: &dyn ChatClient,
        events: &EventSink,
    ) -> Result<String, AiError> {
        let mut messages = self.build_messages();
        let mut accumulated = String::new();
        let mut rounds = 0;

        loop {
            let sink = events.clone();
            let response = client
                .send_message_streaming(
                    &messages,
                    &self.tools,
                    Box::new(move |delta| {
                        let _ = sink.send(StreamEvent::Token(delta));
                    }),
                )
                .await?;
            accumulated.push_str(&response.content);

            let Some(executor) = self.tool_executor.as_ref() else {
                return Ok(accumulated);
            };
            if response.tool_calls.is_empty() {
                return Ok(accumulated);
            }

            rounds += 1;
            if rounds > self.max_tool_rounds {
                debug!("max tool rounds reached, returning partial response");
                return Ok(accumulated);
            }

            // Tool traffic stays in this request's message list only; the
            // transcript never records it.
            messages.push(Message::assistant(response.content.clone()));
            for call in &response.tool_calls {
                debug!(tool = %call.name, "executing tool");
                let result = executor(&call.name, &call.arguments);
                messages.push(Message {
                    role: Role::Tool,
                    content: format!("[Tool Result: {}]\n{}", call.name, result),
                });
            }
        }
    }
}

fn emit(events: &EventSink, event: StreamEvent) {
    // A dropped receiver is the gateway's problem, not the session's.
    let _ = events.send(event);
}
