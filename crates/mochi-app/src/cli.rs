use clap::Parser;

/// Mochi — a desktop pet with a streaming AI chat bubble.
#[derive(Parser, Debug)]
#[command(name = "mochi", version, about)]
pub struct Args {
    /// Model identifier override.
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Disable the built-in tools (shell, eval).
    #[arg(long)]
    pub no_tools: bool,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
