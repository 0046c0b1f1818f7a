//! The three renditions offered to users, from raw upload bytes to output.

use asciify_core::config::RenderConfig;
use tracing::debug;

use crate::codec;
use crate::error::{ImagingError, Result};
use crate::palette::Palette;
use crate::render::{render_text_block, row_budget, RenderedText};
use crate::transform;

/// resize → grayscale → quantize → render.
///
/// Only the rows that fit `config.message_budget` are ever resized and
/// quantized; `total_rows` still reports the full height so the caller can say
/// how much was cut. A budget with room for no rows is `OutputTooLarge`.
pub fn ascii_art(bytes: &[u8], palette: &Palette, config: &RenderConfig) -> Result<RenderedText> {
    let image = codec::decode(bytes)?;
    let width = config.ascii_width as usize;
    let budget_rows = row_budget(width, config.message_budget);
    if budget_rows == 0 {
        return Err(ImagingError::OutputTooLarge {
            width,
            budget: config.message_budget,
        });
    }

    let max_rows = u32::try_from(budget_rows).unwrap_or(u32::MAX);
    let (resized, total_rows) = transform::resize_squashed_capped(
        &image,
        config.ascii_width,
        config.char_aspect,
        max_rows,
    )?;
    let gray = transform::to_grayscale(&resized)?;
    let grid = transform::quantize_to_palette(&gray, palette)?;

    let mut rendered = render_text_block(&grid, config.message_budget);
    rendered.total_rows = total_rows as usize;

    debug!(
        width = grid.width(),
        rows = rendered.rows,
        total_rows = rendered.total_rows,
        "ascii art rendered"
    );
    Ok(rendered)
}

/// Decode, mosaic with `config.pixel_block`, encode as JPEG.
pub fn pixelated_jpeg(bytes: &[u8], config: &RenderConfig) -> Result<Vec<u8>> {
    let image = codec::decode(bytes)?;
    let out = transform::pixelate(&image, config.pixel_block)?;
    codec::encode_jpeg(&out, config.jpeg_quality)
}

/// Decode, invert, encode as JPEG.
pub fn negative_jpeg(bytes: &[u8], config: &RenderConfig) -> Result<Vec<u8>> {
    let image = codec::decode(bytes)?;
    let out = transform::invert(&image)?;
    codec::encode_jpeg(&out, config.jpeg_quality)
}
