use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the fallible edges of DoodlePad: file import/export,
/// settings, and command-line parsing. Canvas operations themselves never fail.
#[derive(Debug, Error)]
pub enum DoodleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to open image '{path}': {message}")]
    Import { path: PathBuf, message: String },

    #[error("Invalid color '{0}' (expected #rrggbb or #rrggbbaa)")]
    InvalidColor(String),

    #[error("Invalid point '{0}' (expected x,y)")]
    InvalidPoint(String),

    #[error("Unknown brush '{0}'")]
    UnknownBrush(String),

    #[error("Invalid operation '{op}': {reason}")]
    InvalidOperation { op: String, reason: String },

    #[error("Invalid canvas size '{0}' (expected WIDTHxHEIGHT)")]
    InvalidSize(String),
}

pub type Result<T> = std::result::Result<T, DoodleError>;
