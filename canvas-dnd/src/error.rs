#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Image format is not supported: {0}")]
    UnsupportedFormat(String),
    #[error("Malformed bitmap: {0}")]
    MalformedBitmap(String),
    #[error("Invalid surface: {0}")]
    InvalidSurface(String),
    #[error("Window has no drag target")]
    NoDragTarget,
    #[error("No active drag session")]
    NoSession,
    #[error("Native data object is missing")]
    MissingData,
    #[error("Platform error: {0}")]
    PlatformError(String),
    #[error("Window handle unavailable: {0}")]
    WindowHandle(#[from] raw_window_handle::HandleError),
    #[error("Image decoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[cfg(target_os="windows")]
    #[error("Windows error: {0}")]
    WindowsError(#[from] windows::core::Error),
}
