//! Command allowlist for the shell tool.

/// Commands the shell tool is allowed to run.
const ALLOWED_COMMANDS: &[&str] = &[
    "ls", "cat", "head", "tail", "wc", "find", "grep", "rg", "git", "date", "uname", "echo",
    "pwd", "whoami", "df", "uptime",
];

/// Validate that the first word of `cmd` is in the command allowlist.
pub fn validate_command(cmd: &str) -> Result<(), String> {
    let first_word = cmd.split_whitespace().next().unwrap_or("");

    // Strip any leading path prefix so `/usr/bin/ls` is treated as `ls`.
    let binary_name = first_word.rsplit('/').next().unwrap_or(first_word);

    if ALLOWED_COMMANDS.contains(&binary_name) {
        Ok(())
    } else {
        Err(format!("command not allowed: {binary_name}"))
    }
}
