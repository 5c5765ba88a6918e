//! Error handling for media-dw

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for media-dw
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{0} not found. Please install it or pass its path explicitly")]
    ToolNotFound(&'static str),

    #[error("{tool} failed: {message}")]
    ToolFailed { tool: &'static str, message: String },

    #[error("File not found: {}", .0.display())]
    BatchFileNotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
