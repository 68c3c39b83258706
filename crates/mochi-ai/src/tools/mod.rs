//! Capabilities the agent may invoke mid-turn.
//!
//! Each tool is a named, schema-described action whose handler returns
//! text. Handler failures are returned as text (`execution failed: ...`),
//! never propagated as stream errors: a tool failure does not fail the
//! chat turn.
//!
//! The shell tool executes commands on the host. That is a deliberate
//! trust boundary owned by deployment policy; the allowlist in `sandbox`
//! narrows it but does not make it safe for untrusted prompts.

mod definitions;
mod eval;
mod sandbox;

pub use definitions::{builtin_executor, builtin_tools, to_openai_tool};
pub use eval::eval_expression;
pub use sandbox::validate_command;

/// Callback for executing tool calls. Takes a tool name + arguments,
/// returns the tool's output string.
pub type ToolExecutor = Box<dyn Fn(&str, &serde_json::Value) -> String + Send + Sync>;
