//! Built-in tool definitions and the default executor.

use tracing::{info, warn};

use crate::ToolDefinition;

use super::eval::eval_expression;
use super::sandbox::validate_command;
use super::ToolExecutor;

/// Tools offered to the model: a sandboxed shell and an arithmetic
/// evaluator.
pub fn builtin_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "shell".into(),
            description: "Run a read-only shell command on the host and return its output".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "The shell command to execute"
                    }
                },
                "required": ["command"]
            }),
        },
        ToolDefinition {
            name: "eval".into(),
            description: "Evaluate an arithmetic expression and return the result".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "expression": {
                        "type": "string",
                        "description": "The arithmetic expression to evaluate"
                    }
                },
                "required": ["expression"]
            }),
        },
    ]
}

/// Executor for the built-in tools. Every failure path returns text so a
/// broken tool invocation never fails the chat turn.
pub fn builtin_executor() -> ToolExecutor {
    Box::new(|name, arguments| match name {
        "shell" => {
            let command = arguments["command"].as_str().unwrap_or("");
            run_shell(command)
        }
        "eval" => {
            let expression = arguments["expression"].as_str().unwrap_or("");
            match eval_expression(expression) {
                Ok(value) => value.to_string(),
                Err(reason) => format!("execution failed: {reason}"),
            }
        }
        other => format!("execution failed: unknown tool '{other}'"),
    })
}

fn run_shell(command: &str) -> String {
    info!(%command, "executing shell tool");
    if let Err(reason) = validate_command(command) {
        warn!(%command, %reason, "shell tool rejected");
        return format!("execution failed: {reason}");
    }
    match std::process::Command::new("sh").arg("-c").arg(command).output() {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stdout.trim().is_empty() {
                stdout.into_owned()
            } else if !stderr.trim().is_empty() {
                stderr.into_owned()
            } else {
                "command completed with no output".into()
            }
        }
        Err(e) => format!("execution failed: {e}"),
    }
}

/// Convert a tool definition to the OpenAI `tools` entry shape.
pub fn to_openai_tool(tool: &ToolDefinition) -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tools_declared() {
        let tools = builtin_tools();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["shell", "eval"]);
        for tool in &tools {
            assert_eq!(tool.parameters["type"], "object");
        }
    }

    #[test]
    fn executor_eval_succeeds() {
        let executor = builtin_executor();
        let result = executor("eval", &serde_json::json!({"expression": "6 * 7"}));
        assert_eq!(result, "42");
    }

    #[test]
    fn executor_failures_are_text() {
        let executor = builtin_executor();

        let result = executor("eval", &serde_json::json!({"expression": "1 / 0"}));
        assert!(result.starts_with("execution failed:"));

        let result = executor("shell", &serde_json::json!({"command": "curl http://x"}));
        assert!(result.starts_with("execution failed:"));

        let result = executor("nope", &serde_json::json!({}));
        assert!(result.starts_with("execution failed:"));
    }

    #[test]
    fn openai_tool_shape() {
        let tools = builtin_tools();
        let converted = to_openai_tool(&tools[0]);
        assert_eq!(converted["type"], "function");
        assert_eq!(converted["function"]["name"], "shell");
        assert_eq!(converted["function"]["parameters"]["type"], "object");
    }
}
