//! Tracing subscriber setup for both binaries

use tracing_subscriber::EnvFilter;

/// Default filter for the HTTP server
pub const SERVER_LOG_FILTER: &str = "chat_relay=info,warp=warn";

/// Default filter for the CLI, which keeps stderr quiet unless something is wrong
pub const CLI_LOG_FILTER: &str = "chat_relay=warn";

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Timestamped logs on stdout; `RUST_LOG` overrides the default filter
/// (`RUST_LOG=off` silences them entirely).
pub fn init_server_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(SERVER_LOG_FILTER))
        .with_target(true)
        .init();
}

/// Logs on stderr so stdout carries nothing but the model's reply
pub fn init_cli_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(CLI_LOG_FILTER))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
