use std::sync::Arc;

use crate::error::Error;

pub type SurfaceRef = Arc<Surface>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelAlpha {
    #[default]
    Opaque,
    Straight,
    Premultiplied,
}

/// Layout of one packed pixel inside a surface buffer.
///
/// Masks and shifts are relative to the pixel read as a native-endian word
/// of `bits_per_pixel` bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceFormat {
    pub(crate) bits_per_pixel: u32,
    pub(crate) red_mask: u32,
    pub(crate) green_mask: u32,
    pub(crate) blue_mask: u32,
    pub(crate) alpha_mask: u32,
    pub(crate) red_shift: u32,
    pub(crate) green_shift: u32,
    pub(crate) blue_shift: u32,
    pub(crate) alpha_shift: u32,
    pub(crate) pixel_alpha: PixelAlpha,
}

impl SurfaceFormat {
    pub fn from_masks(
        bits_per_pixel: u32,
        [red_mask, green_mask, blue_mask, alpha_mask]: [u32; 4],
        pixel_alpha: PixelAlpha,
    ) -> Self {
        let shift = |mask: u32| if mask == 0 { 0 } else { mask.trailing_zeros() };

        Self {
            bits_per_pixel,
            red_mask,
            green_mask,
            blue_mask,
            alpha_mask,
            red_shift: shift(red_mask),
            green_shift: shift(green_mask),
            blue_shift: shift(blue_mask),
            alpha_shift: shift(alpha_mask),
            pixel_alpha,
        }
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel.div_ceil(8) as usize
    }

    pub fn red_mask(&self) -> u32 {
        self.red_mask
    }

    pub fn green_mask(&self) -> u32 {
        self.green_mask
    }

    pub fn blue_mask(&self) -> u32 {
        self.blue_mask
    }

    pub fn alpha_mask(&self) -> u32 {
        self.alpha_mask
    }

    pub fn red_shift(&self) -> u32 {
        self.red_shift
    }

    pub fn green_shift(&self) -> u32 {
        self.green_shift
    }

    pub fn blue_shift(&self) -> u32 {
        self.blue_shift
    }

    pub fn alpha_shift(&self) -> u32 {
        self.alpha_shift
    }

    pub fn pixel_alpha(&self) -> PixelAlpha {
        self.pixel_alpha
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// In-memory image made from a copy of a native pixel buffer.
#[derive(Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    row_bytes: usize,
    format: SurfaceFormat,
    pixels: Vec<u8>,
}

impl Surface {
    /// Copies `height` rows of `row_bytes` stride out of `pixels`. The last
    /// row only needs to hold `width` pixels.
    pub fn from_pixels(
        width: u32,
        height: u32,
        format: SurfaceFormat,
        pixels: &[u8],
        row_bytes: usize,
    ) -> Result<SurfaceRef, Error> {
        if format.bits_per_pixel == 0 || format.bits_per_pixel > 32 || format.bits_per_pixel % 8 != 0 {
            return Err(Error::InvalidSurface(format!("{} bits per pixel", format.bits_per_pixel)));
        }

        let bytes_per_pixel = format.bytes_per_pixel();
        let packed_row_bytes = width as usize * bytes_per_pixel;
        if row_bytes < packed_row_bytes {
            return Err(Error::InvalidSurface(format!("row of {row_bytes} bytes is shorter than {width} pixels")));
        }

        let required = match height {
            0 => 0,
            _ if width == 0 => 0,
            height => row_bytes * (height as usize - 1) + packed_row_bytes,
        };
        if pixels.len() < required {
            return Err(Error::InvalidSurface(format!("buffer holds {} bytes, {required} needed", pixels.len())));
        }

        let mut packed = Vec::with_capacity(packed_row_bytes * height as usize);
        if packed_row_bytes > 0 {
            for row in 0..height as usize {
                let start = row * row_bytes;
                packed.extend_from_slice(&pixels[start..start + packed_row_bytes]);
            }
        }

        Ok(Arc::new(Self {
            width,
            height,
            row_bytes: packed_row_bytes,
            format,
            pixels: packed,
        }))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    pub fn format(&self) -> &SurfaceFormat {
        &self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// Raw packed value of the pixel at (x, y), `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let bytes_per_pixel = self.format.bytes_per_pixel();
        let start = y as usize * self.row_bytes + x as usize * bytes_per_pixel;
        let bytes = &self.pixels[start..start + bytes_per_pixel];

        let value = match bytes_per_pixel {
            4 => u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            2 => u16::from_ne_bytes([bytes[0], bytes[1]]) as u32,
            _ => bytes.iter().rev().fold(0, |value, byte| (value << 8) | *byte as u32),
        };

        Some(value)
    }

    pub fn color(&self, x: u32, y: u32) -> Option<Color> {
        let value = self.pixel(x, y)?;
        let format = &self.format;

        let alpha = match format.pixel_alpha {
            PixelAlpha::Opaque => 255,
            _ => channel(value, format.alpha_mask, format.alpha_shift),
        };

        Some(Color {
            r: channel(value, format.red_mask, format.red_shift),
            g: channel(value, format.green_mask, format.green_shift),
            b: channel(value, format.blue_mask, format.blue_shift),
            a: alpha,
        })
    }
}

fn channel(value: u32, mask: u32, shift: u32) -> u8 {
    if mask == 0 {
        return 0;
    }

    let max = mask >> shift;
    let raw = (value & mask) >> shift;

    if max == 0xff {
        raw as u8
    } else {
        (raw as u64 * 255 / max as u64) as u8
    }
}
