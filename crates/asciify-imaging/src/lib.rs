//! Image transformations behind the bot: ASCII art, mosaic and negative.
//!
//! Everything in here is pure computation over decoded rasters. Decoding and
//! encoding live in [`codec`]; [`pipeline`] glues the pieces into the three
//! user-facing renditions.

pub mod codec;
pub mod error;
pub mod palette;
pub mod pipeline;
pub mod render;
pub mod transform;

pub use error::ImagingError;
pub use palette::Palette;
pub use render::{render_text_block, CharGrid, RenderedText};
