use thiserror::Error;

/// Errors produced by the transformation engine and the text renderer.
///
/// All of them are deterministic for a given input; retrying never helps.
#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("image has zero area")]
    EmptyImage,

    #[error("palette is empty")]
    EmptyPalette,

    #[error("block size {block} is invalid for a {width}x{height} image")]
    InvalidBlockSize { block: u32, width: u32, height: u32 },

    #[error("target width must be at least 1")]
    InvalidWidth,

    #[error("grid rows must all be {expected} chars wide (row {row} has {actual})")]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("a {width}-char row does not fit in a {budget}-char message")]
    OutputTooLarge { width: usize, budget: usize },

    #[error("could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("could not encode image: {0}")]
    Encode(#[source] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ImagingError>;
