//! ChatClient trait implementation for OpenAiClient (SSE streaming).

use async_trait::async_trait;
use tracing::debug;

use crate::streaming::{parse_sse_stream, SseEvent};
use crate::{AiError, ChatClient, ChatResponse, Message, ToolCall, ToolDefinition};

use super::client::OpenAiClient;

/// Accumulates one streamed tool call across `tool_calls` deltas.
#[derive(Default)]
struct PendingToolCall {
    id: String,
    name: String,
    arguments_json: String,
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn send_message_streaming(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        on_delta: Box<dyn Fn(String) + Send + Sync>,
    ) -> Result<ChatResponse, AiError> {
        let body = self.build_request_body(messages, tools, true);

        debug!(model = %self.config.model, "chat completions streaming request");

        let response = self
            .http
            .post(self.config.chat_completions_url())
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let mut full_content = String::new();
        let mut pending_tools: Vec<PendingToolCall> = Vec::new();

        parse_sse_stream(response, |event: SseEvent| {
            if event.is_done() {
                return;
            }
            let Ok(data) = serde_json::from_str::<serde_json::Value>(&event.data) else {
                return;
            };
            let delta = &data["choices"][0]["delta"];

            if let Some(text) = delta["content"].as_str() {
                if !text.is_empty() {
                    full_content.push_str(text);
                    on_delta(text.to_string());
                }
            }

            if let Some(calls) = delta["tool_calls"].as_array() {
                for call in calls {
                    let index = call["index"].as_u64().unwrap_or(0) as usize;
                    while pending_tools.len() <= index {
                        pending_tools.push(PendingToolCall::default());
                    }
                    let pending = &mut pending_tools[index];
                    if let Some(id) = call["id"].as_str() {
                        pending.id.push_str(id);
                    }
                    if let Some(name) = call["function"]["name"].as_str() {
                        pending.name.push_str(name);
                    }
                    if let Some(args) = call["function"]["arguments"].as_str() {
                        pending.arguments_json.push_str(args);
                    }
                }
            }
        })
        .await?;

        let tool_calls = pending_tools
            .into_iter()
            .filter(|p| !p.name.is_empty())
            .map(|p| ToolCall {
                arguments: serde_json::from_str(&p.arguments_json)
                    .unwrap_or(serde_json::Value::Null),
                id: p.id,
                name: p.name,
            })
            .collect();

        Ok(ChatResponse {
            content: full_content,
            tool_calls,
        })
    }
}
