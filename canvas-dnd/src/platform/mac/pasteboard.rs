use std::path::PathBuf;

use objc2::rc::Retained;
use objc2_app_kit::{NSBitmapFormat, NSBitmapImageRep, NSPasteboard, NSPasteboardType, NSPasteboardTypeFileURL, NSPasteboardTypePNG, NSPasteboardTypeTIFF};
use objc2_foundation::{NSArray, NSURL};

use crate::drag_drop::{DragDataItemType, DragDataProvider};
use crate::error::Error;
use crate::pixel_format::{check_sample_depth, infer_surface_format, BitmapLayout};
use crate::surface::{Surface, SurfaceRef};

pub struct PasteboardProvider {
    pasteboard: Retained<NSPasteboard>,
}

impl PasteboardProvider {
    pub fn new(pasteboard: Retained<NSPasteboard>) -> Self {
        Self {
            pasteboard,
        }
    }

    fn has_type(&self, wanted: &[&NSPasteboardType]) -> bool {
        let Some(types) = (unsafe { self.pasteboard.types() }) else {
            return false;
        };

        types.iter().any(|pasteboard_type| wanted.iter().any(|wanted| pasteboard_type.isEqualToString(wanted)))
    }
}

/// Image types in order of preference.
fn image_types() -> [&'static NSPasteboardType; 2] {
    unsafe { [NSPasteboardTypePNG, NSPasteboardTypeTIFF] }
}

fn bitmap_layout(bitmap: &NSBitmapImageRep) -> BitmapLayout {
    let format = unsafe { bitmap.bitmapFormat() };

    unsafe {
        BitmapLayout {
            bits_per_pixel: bitmap.bitsPerPixel() as u32,
            samples_per_pixel: bitmap.samplesPerPixel() as u32,
            has_alpha: bitmap.hasAlpha(),
            alpha_first: format.contains(NSBitmapFormat::AlphaFirst),
            big_endian: format.contains(NSBitmapFormat::SixteenBitBigEndian)
                || format.contains(NSBitmapFormat::ThirtyTwoBitBigEndian),
            premultiplied: !format.contains(NSBitmapFormat::AlphaNonpremultiplied),
            floating_point: format.contains(NSBitmapFormat::FloatingPointSamples),
            planar: bitmap.isPlanar(),
        }
    }
}

impl DragDataProvider for PasteboardProvider {
    fn paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        unsafe {
            let Some(items) = self.pasteboard.pasteboardItems() else {
                return paths;
            };

            for item in items.iter() {
                if let Some(path) = item.stringForType(NSPasteboardTypeFileURL)
                    .and_then(|url| NSURL::URLWithString(&url))
                    .and_then(|url| url.path())
                {
                    paths.push(PathBuf::from(path.to_string()));
                }
            }
        }

        paths
    }

    fn image(&self) -> Result<Option<SurfaceRef>, Error> {
        let types = NSArray::from_slice(&image_types());

        let Some(image_type) = (unsafe { self.pasteboard.availableTypeFromArray(&types) }) else {
            return Ok(None);
        };

        log::debug!("Reading dragged image as {image_type}");

        let data = unsafe { self.pasteboard.dataForType(&image_type) }
            .ok_or_else(|| Error::PlatformError(format!("{image_type} data is not available")))?;

        let bitmap = unsafe { NSBitmapImageRep::imageRepWithData(&data) }
            .ok_or_else(|| Error::UnsupportedFormat(format!("{image_type} could not be decoded")))?;

        let layout = bitmap_layout(&bitmap);
        let format = check_sample_depth(&layout)
            .and_then(|()| infer_surface_format(&layout))
            .inspect_err(|error| log::warn!("Dragged image is not supported: {error}"))?;

        let (width, height, row_bytes, pixels) = unsafe {
            (bitmap.pixelsWide(), bitmap.pixelsHigh(), bitmap.bytesPerRow(), bitmap.bitmapData())
        };

        if pixels.is_null() || width < 0 || height < 0 || row_bytes < 0 {
            return Err(Error::UnsupportedFormat("bitmap has no pixel data".into()));
        }

        let pixels = unsafe { std::slice::from_raw_parts(pixels, row_bytes as usize * height as usize) };

        Surface::from_pixels(width as u32, height as u32, format, pixels, row_bytes as usize).map(Some)
    }

    fn contains(&self, item_type: DragDataItemType) -> bool {
        match item_type {
            DragDataItemType::Paths => self.has_type(&[unsafe { NSPasteboardTypeFileURL }]),
            DragDataItemType::Image => self.has_type(&image_types()),
        }
    }
}
