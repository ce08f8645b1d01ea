use thiserror::Error;

/// Application-level errors.
///
/// Every fallible session operation returns one of these; the update loop
/// reports them in the status line instead of crashing, and the session is
/// left in a consistent idle state afterwards.
#[derive(Debug, Error)]
pub enum Error {
    /// The camera or video source could not be opened or stopped delivering.
    #[error("capture source unavailable: {0}")]
    SourceUnavailable(String),

    /// The barcode decoder rejected the frame outright.
    ///
    /// "No barcode found" is not a decode failure; that case yields an
    /// empty result list.
    #[error("barcode decode failed: {0}")]
    Decode(String),

    /// File system failure while saving or loading.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// Image encode/decode failure (unsupported format, corrupt file).
    #[error("image failure: {0}")]
    Image(#[from] image::ImageError),
}
