use std::ffi::OsString;
use std::os::windows::prelude::OsStringExt;
use std::path::PathBuf;
use std::ptr::null_mut;

use windows::Win32::Foundation::{HGLOBAL, S_OK};
use windows::Win32::System::Com::{CoTaskMemFree, IDataObject, DATADIR_GET, DVASPECT_CONTENT, FORMATETC, STGMEDIUM, TYMED_HGLOBAL};
use windows::Win32::System::DataExchange::GetClipboardFormatNameW;
use windows::Win32::System::Memory::{GlobalLock, GlobalSize, GlobalUnlock};
use windows::Win32::System::Ole::ReleaseStgMedium;
use windows::Win32::UI::Shell::{DragQueryFileW, HDROP};

use crate::clipboard_format::{has_paths, preferred_image_format, ClipboardFormat, ImageEncoding, CF_HDROP};
use crate::codec::{decode_dib, decode_png};
use crate::drag_drop::{DragDataItemType, DragDataProvider};
use crate::error::Error;
use crate::surface::SurfaceRef;

pub struct DataObjectProvider {
    data_object: IDataObject,
}

impl DataObjectProvider {
    pub fn new(data_object: IDataObject) -> Self {
        Self {
            data_object,
        }
    }

    fn available_formats(&self) -> Vec<ClipboardFormat> {
        let mut formats = Vec::new();

        unsafe {
            let Ok(enumerator) = self.data_object.EnumFormatEtc(DATADIR_GET.0 as u32) else {
                return formats;
            };

            let mut format = [FORMATETC::default()];
            while enumerator.Next(&mut format, None) == S_OK {
                formats.push(clipboard_format(format[0].cfFormat));

                if !format[0].ptd.is_null() {
                    CoTaskMemFree(Some(format[0].ptd as _));
                    format[0].ptd = null_mut();
                }
            }
        }

        formats
    }

    fn read_format(&self, format: u16) -> Option<Vec<u8>> {
        unsafe {
            let mut medium = self.data_object.GetData(&format_etc(format)).ok()?;

            let bytes = medium_hglobal(&medium).and_then(|hglobal| global_bytes(hglobal));

            ReleaseStgMedium(&mut medium);
            bytes
        }
    }
}

impl DragDataProvider for DataObjectProvider {
    fn paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        unsafe {
            let Ok(mut medium) = self.data_object.GetData(&format_etc(CF_HDROP)) else {
                return paths;
            };

            if let Some(hglobal) = medium_hglobal(&medium) {
                paths = hdrop_paths(hglobal);
            }

            ReleaseStgMedium(&mut medium);
        }

        paths
    }

    fn image(&self) -> Result<Option<SurfaceRef>, Error> {
        let Some((format, encoding)) = preferred_image_format(&self.available_formats()) else {
            return Ok(None);
        };

        log::debug!("Reading dragged image as {encoding:?}");

        let bytes = self.read_format(format)
            .ok_or_else(|| Error::PlatformError(format!("{encoding:?} data is not available")))?;

        let surface = match encoding {
            ImageEncoding::Png => decode_png(&bytes),
            ImageEncoding::DibV5 | ImageEncoding::Dib => decode_dib(&bytes),
        };

        if let Err(Error::UnsupportedFormat(reason)) = &surface {
            log::warn!("Dragged image is not supported: {reason}");
        }

        surface.map(Some)
    }

    fn contains(&self, item_type: DragDataItemType) -> bool {
        let formats = self.available_formats();

        match item_type {
            DragDataItemType::Paths => has_paths(&formats),
            DragDataItemType::Image => preferred_image_format(&formats).is_some(),
        }
    }
}

fn format_etc(format: u16) -> FORMATETC {
    FORMATETC {
        cfFormat: format,
        ptd: null_mut(),
        dwAspect: DVASPECT_CONTENT.0 as u32,
        lindex: -1,
        tymed: TYMED_HGLOBAL.0 as u32,
    }
}

fn clipboard_format(id: u16) -> ClipboardFormat {
    // Only registered formats have names
    if id < 0xc000 {
        return ClipboardFormat::standard(id);
    }

    let mut name = [0u16; 100];
    let length = unsafe { GetClipboardFormatNameW(id as u32, &mut name) };
    if length <= 0 {
        return ClipboardFormat::standard(id);
    }

    ClipboardFormat::registered(id, String::from_utf16_lossy(&name[..length as usize]))
}

unsafe fn hdrop_paths(hglobal: HGLOBAL) -> Vec<PathBuf> {
    let hdrop = HDROP(unsafe { GlobalLock(hglobal) });
    if hdrop.0.is_null() {
        return Vec::new();
    }

    let item_count = unsafe { DragQueryFileW(hdrop, 0xFFFFFFFF, None) };
    let mut paths = Vec::with_capacity(item_count as usize);

    for i in 0..item_count {
        let characters = unsafe { DragQueryFileW(hdrop, i, None) } as usize;
        if characters == 0 {
            continue;
        }

        let mut buffer = vec![0; characters + 1];
        unsafe { DragQueryFileW(hdrop, i, Some(&mut buffer)) };

        paths.push(OsString::from_wide(&buffer[..characters]).into());
    }

    let _ = unsafe { GlobalUnlock(hglobal) };
    paths
}

/// The medium's global memory handle, if that is how the data was delivered.
fn medium_hglobal(medium: &STGMEDIUM) -> Option<HGLOBAL> {
    if medium.tymed != TYMED_HGLOBAL.0 as u32 {
        return None;
    }

    Some(unsafe { medium.u.hGlobal })
}

unsafe fn global_bytes(hglobal: HGLOBAL) -> Option<Vec<u8>> {
    let ptr = unsafe { GlobalLock(hglobal) };
    if ptr.is_null() {
        return None;
    }

    let size = unsafe { GlobalSize(hglobal) };
    let bytes = unsafe { std::slice::from_raw_parts(ptr as *const u8, size) }.to_vec();
    let _ = unsafe { GlobalUnlock(hglobal) };

    Some(bytes)
}
