//! Media-dw library
//!
//! Classifies media URLs, hands them to external download tools, keeps a
//! bounded download history and drives single and batch downloads from a
//! console menu.

pub mod app;
pub mod batch;
pub mod classifier;
pub mod extractor;
pub mod history;
pub mod menu;
pub mod utils;

// Re-export main types for easier use
pub use app::Session;
pub use batch::{BatchEvent, BatchReport, BatchRunner};
pub use classifier::{detect_platform, extract_native_id, validate, Platform};
pub use extractor::{DownloadOutcome, FailureKind, FetchGateway};
pub use history::{DownloadRecord, HistoryStore};
pub use menu::{MenuController, Prompter};
pub use utils::{AppSettings, MediaError, Quality};
