//! Classification of the formats a Windows data object offers.
//!
//! Standard format ids are fixed by the system; PNG has no standard id and
//! is recognised by its registered name.

pub const CF_DIB: u16 = 8;
pub const CF_HDROP: u16 = 15;
pub const CF_DIBV5: u16 = 17;

/// Image encodings in order of preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImageEncoding {
    Png,
    DibV5,
    Dib,
}

/// A format offered by a data object. Registered formats carry their name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipboardFormat {
    pub id: u16,
    pub name: Option<String>,
}

impl ClipboardFormat {
    pub fn standard(id: u16) -> Self {
        Self {
            id,
            name: None,
        }
    }

    pub fn registered(id: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }

    pub fn image_encoding(&self) -> Option<ImageEncoding> {
        match (self.id, self.name.as_deref()) {
            (CF_DIBV5, _) => Some(ImageEncoding::DibV5),
            (CF_DIB, _) => Some(ImageEncoding::Dib),
            (_, Some(name)) if name.eq_ignore_ascii_case("PNG") || name.eq_ignore_ascii_case("image/png") => {
                Some(ImageEncoding::Png)
            }
            _ => None,
        }
    }
}

/// Picks the format to read an image from, if any is offered.
pub fn preferred_image_format(formats: &[ClipboardFormat]) -> Option<(u16, ImageEncoding)> {
    formats
        .iter()
        .filter_map(|format| format.image_encoding().map(|encoding| (format.id, encoding)))
        .min_by_key(|(_, encoding)| *encoding)
}

pub fn has_paths(formats: &[ClipboardFormat]) -> bool {
    formats.iter().any(|format| format.id == CF_HDROP)
}

#[cfg(test)]
mod tests {
    use super::{has_paths, preferred_image_format, ClipboardFormat, ImageEncoding, CF_DIB, CF_DIBV5, CF_HDROP};

    const CF_UNICODETEXT: u16 = 13;

    #[test]
    fn png_beats_bitmaps() {
        let formats = [
            ClipboardFormat::standard(CF_DIB),
            ClipboardFormat::standard(CF_DIBV5),
            ClipboardFormat::registered(0xc123, "PNG"),
        ];

        assert_eq!(preferred_image_format(&formats), Some((0xc123, ImageEncoding::Png)));
    }

    #[test]
    fn dib_v5_beats_dib() {
        let formats = [ClipboardFormat::standard(CF_DIB), ClipboardFormat::standard(CF_DIBV5)];
        assert_eq!(preferred_image_format(&formats), Some((CF_DIBV5, ImageEncoding::DibV5)));

        let formats = [ClipboardFormat::standard(CF_DIB)];
        assert_eq!(preferred_image_format(&formats), Some((CF_DIB, ImageEncoding::Dib)));
    }

    #[test]
    fn png_mime_name_is_recognised() {
        let format = ClipboardFormat::registered(0xc200, "image/PNG");
        assert_eq!(format.image_encoding(), Some(ImageEncoding::Png));

        let format = ClipboardFormat::registered(0xc201, "PNG Portable Network Graphics");
        assert_eq!(format.image_encoding(), None);
    }

    #[test]
    fn paths_only_transfer_has_no_image() {
        let formats = [
            ClipboardFormat::standard(CF_HDROP),
            ClipboardFormat::registered(0xc300, "FileNameW"),
        ];

        assert!(has_paths(&formats));
        assert_eq!(preferred_image_format(&formats), None);
    }

    #[test]
    fn image_only_transfer_has_no_paths() {
        let formats = [ClipboardFormat::standard(CF_UNICODETEXT), ClipboardFormat::standard(CF_DIB)];

        assert!(!has_paths(&formats));
        assert!(preferred_image_format(&formats).is_some());
        assert!(!has_paths(&[]));
    }
}
