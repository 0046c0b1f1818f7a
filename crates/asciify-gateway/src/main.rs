use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use asciify_core::AsciifyConfig;
use asciify_sessions::{run_sweeper, SessionStore};
use asciify_telegram::TelegramAdapter;

/// Telegram bot that turns photos into pixel mosaics, negatives and ASCII art.
#[derive(Debug, Parser)]
#[command(name = "asciify", version)]
struct Cli {
    /// Config file (falls back to $ASCIIFY_CONFIG, then ~/.asciify/asciify.toml).
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "asciify=info,asciify_telegram=info,asciify_flow=info,asciify_sessions=info".into()
            }),
        )
        .init();

    let cli = Cli::parse();
    let config = AsciifyConfig::load(cli.config.as_deref())?;

    let sessions = Arc::new(SessionStore::new());
    let sweeper = tokio::spawn(run_sweeper(
        Arc::clone(&sessions),
        Duration::from_secs(config.sessions.idle_ttl_secs),
        Duration::from_secs(config.sessions.sweep_interval_secs),
    ));

    info!(
        ascii_width = config.render.ascii_width,
        message_budget = config.render.message_budget,
        pixel_block = config.render.pixel_block,
        "asciify starting"
    );

    let adapter = TelegramAdapter::new(&config.telegram, config.render.clone(), sessions);
    let result = adapter.run().await;

    sweeper.abort();
    result?;
    info!("asciify stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_flag_is_optional() {
        let cli = Cli::parse_from(["asciify"]);
        assert!(cli.config.is_none());

        let cli = Cli::parse_from(["asciify", "--config", "/etc/asciify.toml"]);
        assert_eq!(cli.config.as_deref(), Some("/etc/asciify.toml"));
    }
}
