use thiserror::Error;

use asciify_channels::ChannelError;
use asciify_imaging::ImagingError;

/// Anything that ends a single request. None of these are fatal to the process.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Imaging(#[from] ImagingError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("transformation worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl FlowError {
    /// Text shown to the user when their request fails.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Imaging(ImagingError::EmptyImage) => {
                "That image has no pixels in it.".to_string()
            }
            FlowError::Imaging(ImagingError::EmptyPalette) => {
                "The character set can't be empty.".to_string()
            }
            FlowError::Imaging(ImagingError::InvalidBlockSize { block, .. }) => format!(
                "That image is too small to pixelate; it needs to be at least {block}x{block} pixels."
            ),
            FlowError::Imaging(ImagingError::OutputTooLarge { .. }) => {
                "The ASCII art is too large to fit in a message.".to_string()
            }
            FlowError::Imaging(ImagingError::Decode(_)) => {
                "I couldn't read that image. Please send a regular photo.".to_string()
            }
            FlowError::Imaging(_) | FlowError::Worker(_) => {
                "Something went wrong while processing your image.".to_string()
            }
            FlowError::Channel(ChannelError::TooLarge { max, .. }) => format!(
                "That file is too large to download (limit is {} MB).",
                max / (1024 * 1024)
            ),
            FlowError::Channel(ChannelError::FetchFailed(_)) => {
                "I couldn't download your photo. Please send it again.".to_string()
            }
            FlowError::Channel(ChannelError::SendFailed(_)) => {
                "I couldn't send the result. Please try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_size_message_names_the_minimum() {
        let err = FlowError::from(ImagingError::InvalidBlockSize {
            block: 20,
            width: 10,
            height: 10,
        });
        assert!(err.user_message().contains("20x20"));
    }

    #[test]
    fn too_large_message_in_megabytes() {
        let err = FlowError::from(ChannelError::TooLarge {
            size: 30 * 1024 * 1024,
            max: 20 * 1024 * 1024,
        });
        assert!(err.user_message().contains("20 MB"));
    }
}
