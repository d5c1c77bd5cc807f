//! Error types for G-code analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while analyzing a G-code file.
///
/// Malformed G-code *lines* are never an error: the analyzer is a
/// best-effort parser and skips anything it does not recognize.
#[derive(Error, Debug)]
pub enum GcodeError {
    /// The G-code file does not exist.
    #[error("gcode file not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for G-code analysis.
pub type Result<T> = std::result::Result<T, GcodeError>;
