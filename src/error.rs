//! Error types for rendering and exporting codes

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rendering and export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or exporting a code
#[derive(Error, Debug)]
pub enum Error {
    /// Text could not be encoded as a QR symbol (usually too long)
    #[error("Could not encode text: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// Quiet zone wider than the renderer accepts
    #[error("Margin of {0} modules is too large")]
    Margin(u32),

    /// Download requested while nothing is rendered
    #[error("Nothing to download, enter some text first")]
    NoSurface,

    /// A color string was not `#rgb` or `#rrggbb`
    #[error("Invalid color '{0}' (expected #rrggbb)")]
    InvalidColor(String),

    /// PNG encoding failed
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// Writing the exported file failed
    #[error("Could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
