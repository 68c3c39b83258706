//! OpenAI-compatible chat completions client.
//!
//! Works against any endpoint speaking the `/chat/completions` wire
//! format (OpenAI, DeepSeek, local proxies, ...).

mod api;
mod client;

pub use client::OpenAiClient;
