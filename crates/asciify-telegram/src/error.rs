use asciify_flow::FlowError;

/// Errors produced by the Telegram adapter.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("no bot token configured")]
    NoToken,

    #[error("conversation setup failed: {0}")]
    Flow(#[from] FlowError),
}
