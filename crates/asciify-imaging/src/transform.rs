//! Pure raster operations. No I/O, no session state.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage};

use crate::error::{ImagingError, Result};
use crate::palette::Palette;
use crate::render::CharGrid;

fn ensure_non_empty(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ImagingError::EmptyImage);
    }
    Ok(())
}

/// Height for `target_width` keeping the source ratio, scaled by `squash`.
fn scaled_height(width: u32, height: u32, target_width: u32, squash: f64) -> u32 {
    let h = f64::from(target_width) * f64::from(height) / f64::from(width) * squash;
    h.round().max(1.0) as u32
}

/// Resize to `target_width`, with `target_height = round(target_width * h / w)`.
pub fn resize_preserving_aspect(image: &DynamicImage, target_width: u32) -> Result<DynamicImage> {
    resize_squashed(image, target_width, 1.0)
}

/// Like [`resize_preserving_aspect`], with the height further multiplied by
/// `squash`. Text cells are taller than wide, so the ASCII path uses < 1.
pub fn resize_squashed(image: &DynamicImage, target_width: u32, squash: f32) -> Result<DynamicImage> {
    let (width, height) = image.dimensions();
    ensure_non_empty(width, height)?;
    if target_width == 0 {
        return Err(ImagingError::InvalidWidth);
    }

    let target_height = scaled_height(width, height, target_width, f64::from(squash));
    Ok(image.resize_exact(target_width, target_height, FilterType::Triangle))
}

/// [`resize_squashed`] keeping at most `max_rows` rows from the top.
///
/// Only the part of the source that maps onto the kept rows is resampled, so
/// a very tall input never materializes its full resized height. Returns the
/// resized image and the height the uncapped resize would have had.
pub fn resize_squashed_capped(
    image: &DynamicImage,
    target_width: u32,
    squash: f32,
    max_rows: u32,
) -> Result<(DynamicImage, u32)> {
    let (width, height) = image.dimensions();
    ensure_non_empty(width, height)?;
    if target_width == 0 {
        return Err(ImagingError::InvalidWidth);
    }

    let total = scaled_height(width, height, target_width, f64::from(squash));
    let rows = total.min(max_rows.max(1));
    if rows == total {
        let resized = image.resize_exact(target_width, total, FilterType::Triangle);
        return Ok((resized, total));
    }

    let source_rows = (u64::from(rows) * u64::from(height))
        .div_ceil(u64::from(total))
        .clamp(1, u64::from(height)) as u32;
    let visible = image.crop_imm(0, 0, width, source_rows);
    Ok((
        visible.resize_exact(target_width, rows, FilterType::Triangle),
        total,
    ))
}

/// Luminance conversion; dimensions are unchanged.
pub fn to_grayscale(image: &DynamicImage) -> Result<GrayImage> {
    let (width, height) = image.dimensions();
    ensure_non_empty(width, height)?;
    Ok(image.to_luma8())
}

/// Map every pixel of `gray` to a palette character.
pub fn quantize_to_palette(gray: &GrayImage, palette: &Palette) -> Result<CharGrid> {
    let (width, height) = gray.dimensions();
    ensure_non_empty(width, height)?;

    let cells: Vec<char> = gray.pixels().map(|p| palette.char_for(p[0])).collect();
    Ok(CharGrid::from_cells(
        width as usize,
        height as usize,
        cells,
    ))
}

/// Blocky mosaic: nearest-neighbor down to `(w / b, h / b)`, then back up to `(w, h)`.
pub fn pixelate(image: &DynamicImage, block_size: u32) -> Result<DynamicImage> {
    let (width, height) = image.dimensions();
    ensure_non_empty(width, height)?;
    if block_size == 0 || block_size > width || block_size > height {
        return Err(ImagingError::InvalidBlockSize {
            block: block_size,
            width,
            height,
        });
    }

    let small_w = (width / block_size).max(1);
    let small_h = (height / block_size).max(1);
    let small = image.resize_exact(small_w, small_h, FilterType::Nearest);
    Ok(small.resize_exact(width, height, FilterType::Nearest))
}

/// Color negative. Color channels become `max - v`; alpha is left alone.
pub fn invert(image: &DynamicImage) -> Result<DynamicImage> {
    let (width, height) = image.dimensions();
    ensure_non_empty(width, height)?;

    let mut out = image.clone();
    out.invert();
    Ok(out)
}
