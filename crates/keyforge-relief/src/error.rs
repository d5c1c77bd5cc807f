//! Error types for the relief pipeline.

use thiserror::Error;

/// Errors that can occur while turning an image into a printable mesh.
#[derive(Error, Debug)]
pub enum ReliefError {
    /// The input bytes could not be decoded as an image.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// Degenerate geometry: a failed solid boolean, or inconsistent
    /// geometric input.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Invalid relief settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for relief operations.
pub type Result<T> = std::result::Result<T, ReliefError>;
