use crate::error::Error;
use crate::surface::{PixelAlpha, SurfaceFormat};

/// Packed-pixel layout as reported by a native bitmap object.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapLayout {
    pub bits_per_pixel: u32,
    pub samples_per_pixel: u32,
    pub has_alpha: bool,
    /// Alpha is stored before the color samples.
    pub alpha_first: bool,
    /// Samples are big-endian for their word width (16 or 32 bits).
    pub big_endian: bool,
    pub premultiplied: bool,
    pub floating_point: bool,
    pub planar: bool,
}

/// Surfaces hold at most 32 bits per pixel with 8-bit samples; 16-bit
/// samples (common in TIFF and PNG) and wider pixels are not describable.
pub fn check_sample_depth(layout: &BitmapLayout) -> Result<(), Error> {
    let bits_per_sample = layout.bits_per_pixel.checked_div(layout.samples_per_pixel).unwrap_or(0);

    if layout.bits_per_pixel > 32 || bits_per_sample > 8 {
        return Err(Error::UnsupportedFormat(format!(
            "{} bits per pixel in {} samples",
            layout.bits_per_pixel, layout.samples_per_pixel,
        )));
    }

    Ok(())
}

pub fn infer_surface_format(layout: &BitmapLayout) -> Result<SurfaceFormat, Error> {
    if layout.floating_point {
        return Err(Error::UnsupportedFormat("floating point samples".into()));
    }
    if layout.planar {
        return Err(Error::UnsupportedFormat("planar samples".into()));
    }

    let mut format = SurfaceFormat {
        bits_per_pixel: layout.bits_per_pixel,
        ..Default::default()
    };

    // We need three samples for red, green and blue
    if layout.samples_per_pixel >= 3 {
        // 16 bpp bitmaps are assumed to be 5-5-5
        let bits_per_sample = if layout.bits_per_pixel == 16 { 5 } else { 8 };
        let mut shift = 0;

        if layout.has_alpha && layout.alpha_first {
            format.alpha_shift = 0;
            shift += bits_per_sample;
        } else {
            format.alpha_shift = 3 * bits_per_sample;
        }

        for channel_shift in [&mut format.red_shift, &mut format.green_shift, &mut format.blue_shift] {
            *channel_shift = shift;
            shift += bits_per_sample;
        }

        if layout.big_endian {
            if layout.has_alpha {
                std::mem::swap(&mut format.red_shift, &mut format.alpha_shift);
                std::mem::swap(&mut format.green_shift, &mut format.blue_shift);
            } else {
                std::mem::swap(&mut format.red_shift, &mut format.blue_shift);
            }
        }

        let sample_mask = (1u32 << bits_per_sample) - 1;
        format.red_mask = sample_mask << format.red_shift;
        format.green_mask = sample_mask << format.green_shift;
        format.blue_mask = sample_mask << format.blue_shift;
        format.alpha_mask = if layout.has_alpha { sample_mask << format.alpha_shift } else { 0 };
    }

    format.pixel_alpha = match (layout.has_alpha, layout.premultiplied) {
        (false, _) => PixelAlpha::Opaque,
        (true, false) => PixelAlpha::Straight,
        (true, true) => PixelAlpha::Premultiplied,
    };

    Ok(format)
}
