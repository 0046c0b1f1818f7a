//! Raster codec boundary: bytes in, bytes out.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};

use crate::error::{ImagingError, Result};

/// Decode any format the `image` crate recognises from its magic bytes.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let image = image::load_from_memory(bytes).map_err(ImagingError::Decode)?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ImagingError::EmptyImage);
    }
    Ok(image)
}

/// Encode as baseline JPEG. Alpha is dropped; JPEG has no alpha channel.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    encoder
        .encode_image(&DynamicImage::ImageRgb8(image.to_rgb8()))
        .map_err(ImagingError::Encode)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([40, 80, 120]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn decode_png() {
        let img = decode(&png_bytes(6, 4)).unwrap();
        assert_eq!(img.dimensions(), (6, 4));
    }

    #[test]
    fn decode_garbage_fails() {
        assert!(matches!(
            decode(b"definitely not an image"),
            Err(ImagingError::Decode(_))
        ));
    }

    #[test]
    fn jpeg_output_has_soi_marker_and_decodes() {
        let img = decode(&png_bytes(16, 8)).unwrap();
        let jpeg = encode_jpeg(&img, 90).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(decode(&jpeg).unwrap().dimensions(), (16, 8));
    }
}
