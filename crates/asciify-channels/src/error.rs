use thiserror::Error;

/// Errors reported by a messaging gateway.
///
/// The core never retries these; they end the request that triggered them.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The uploaded photo could not be retrieved from the media store.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// The upload is larger than the configured download ceiling.
    #[error("File too large: {size} bytes (max {max})")]
    TooLarge { size: u64, max: u64 },

    /// A reply could not be delivered.
    #[error("Send failed: {0}")]
    SendFailed(String),
}
