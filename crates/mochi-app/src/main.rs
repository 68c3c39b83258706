mod bubble;
mod cli;
mod gateway;

use std::time::Instant;

use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use mochi_ai::tools::builtin_executor;
use mochi_ai::{builtin_tools, AgentConfig, AiError, ChatSession, OpenAiClient};

use bubble::{BubblePresenter, BubbleState};
use gateway::{SessionGateway, WireMessage};

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root — two levels up from crates/mochi-app/
        manifest_dir.join("..").join("..").join(".env"),
        // Current directory
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file before reading any configuration
    load_dotenv();

    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("mochi=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "mochi=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("Mochi v{} starting...", env!("CARGO_PKG_VERSION"));

    // A missing API key is fatal: surface it to the user instead of
    // degrading silently.
    let config = match AgentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("agent init failed: {e}");
            let mut fatal = BubblePresenter::new();
            fatal.show_persistent(format!("AI unavailable: {e}"));
            eprintln!("{}", fatal.display_text());
            std::process::exit(1);
        }
    };
    let config = match args.model {
        Some(model) => config.with_model(model),
        None => config,
    };
    tracing::info!(model = %config.model, base_url = %config.base_url, "agent configured");

    let client = OpenAiClient::new(config);
    let mut session = if args.no_tools {
        ChatSession::new()
    } else {
        ChatSession::new()
            .with_tools(builtin_tools())
            .with_tool_executor(builtin_executor())
    };

    let (outbound, rx) = mpsc::unbounded_channel();
    let gateway = SessionGateway::new(outbound);

    let presenter = tokio::spawn(run_presenter(rx));

    // Headless stand-in for the pet window: one stdin line per message.
    // The REPL plays the presentation side of the boundary, so each line
    // is framed as a `user-message` and decoded the way any peer's input
    // would be.
    println!("mochi is listening — type a message, Ctrl-D to quit");
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let frame = serde_json::to_string(&WireMessage::UserMessage { text: line })
            .unwrap_or_default();
        let Some(text) = SessionGateway::parse_user_input(&frame) else {
            continue;
        };
        match gateway.on_user_input(&mut session, &client, &text).await {
            Ok(()) => {}
            Err(AiError::Busy) => println!("[still replying, hold on]"),
            Err(e) => println!("[error] {e}"),
        }
    }

    drop(gateway);
    let _ = presenter.await;
    tracing::info!("Shutdown complete");
}

/// Presentation loop: renders stream events and drives the bubble's
/// auto-hide clock.
async fn run_presenter(mut rx: mpsc::UnboundedReceiver<WireMessage>) {
    use std::io::Write;

    let mut bubble = BubblePresenter::new();
    loop {
        let next_hide = bubble.hide_deadline();
        let hide_sleep = async move {
            match next_hide {
                Some(deadline) => {
                    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
                }
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            message = rx.recv() => {
                let Some(message) = message else { break };
                bubble.handle(&message, Instant::now());
                match &message {
                    WireMessage::AiStreamStart => {
                        print!("mochi: ");
                        let _ = std::io::stdout().flush();
                    }
                    WireMessage::AiStreamToken { token } => {
                        print!("{token}");
                        let _ = std::io::stdout().flush();
                    }
                    WireMessage::AiStreamEnd => println!(),
                    WireMessage::AiError { message } => println!("\n[error] {message}"),
                    WireMessage::UserMessage { .. } => {}
                }
            }
            _ = hide_sleep => {
                bubble.poll(Instant::now());
                if bubble.state() == BubbleState::Hidden {
                    tracing::debug!("bubble hidden");
                }
            }
        }
    }
}
