//! Decoders for image payloads the platform hands over as encoded bytes.

use std::io::Cursor;

use image::codecs::bmp::BmpDecoder;
use image::{DynamicImage, ImageError, ImageFormat, RgbImage, RgbaImage};

use crate::error::Error;
use crate::pixel_format::{infer_surface_format, BitmapLayout};
use crate::surface::{Surface, SurfaceRef};

pub fn decode_png(bytes: &[u8]) -> Result<SurfaceRef, Error> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    rgba_surface(image.into_rgba8())
}

/// Decodes a packed device-independent bitmap (the CF_DIB and CF_DIBV5
/// clipboard layout: header, optional masks and palette, then pixels).
pub fn decode_dib(bytes: &[u8]) -> Result<SurfaceRef, Error> {
    let image = BmpDecoder::new_without_file_header(Cursor::new(bytes))
        .and_then(DynamicImage::from_decoder)
        .map_err(bitmap_error)?;

    if image.color().has_alpha() {
        rgba_surface(image.into_rgba8())
    } else {
        rgb_surface(image.into_rgb8())
    }
}

fn rgba_surface(image: RgbaImage) -> Result<SurfaceRef, Error> {
    let (width, height) = image.dimensions();

    // Read back as native-endian words
    let format = infer_surface_format(&BitmapLayout {
        bits_per_pixel: 32,
        samples_per_pixel: 4,
        has_alpha: true,
        big_endian: cfg!(target_endian = "big"),
        ..Default::default()
    })?;

    Surface::from_pixels(width, height, format, image.as_raw(), width as usize * 4)
}

fn rgb_surface(image: RgbImage) -> Result<SurfaceRef, Error> {
    let (width, height) = image.dimensions();

    let format = infer_surface_format(&BitmapLayout {
        bits_per_pixel: 24,
        samples_per_pixel: 3,
        ..Default::default()
    })?;

    Surface::from_pixels(width, height, format, image.as_raw(), width as usize * 3)
}

fn bitmap_error(error: ImageError) -> Error {
    match error {
        ImageError::Unsupported(error) => Error::UnsupportedFormat(error.to_string()),
        error => Error::MalformedBitmap(error.to_string()),
    }
}
