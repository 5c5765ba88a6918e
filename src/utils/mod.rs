//! Utility modules for error handling, configuration and filesystem lookups

pub mod config;
pub mod error;
pub mod paths;
pub mod tools;

// Re-export for convenience
pub use config::{AppSettings, Quality, DEFAULT_REQUEST_DELAY, HISTORY_CAP, HISTORY_FILE_NAME};
pub use error::MediaError;
pub use paths::{download_root_candidates, pick_download_root, resolve_download_root};
pub use tools::{find_tool, INSTALOADER, YTDLP};
