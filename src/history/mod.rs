//! Download history module

pub mod store;

// Re-export for convenience
pub use store::{DownloadRecord, HistoryStore};
