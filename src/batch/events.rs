use crate::classifier::Platform;
use crate::extractor::{DownloadOutcome, FetchFailure};
use std::time::Duration;

/// Progress events emitted while a batch runs
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// Processing of an item began (1-based index)
    ItemStarted {
        index: usize,
        total: usize,
        url: String,
    },
    /// Item rejected before any fetch
    ItemSkipped {
        index: usize,
        url: String,
        failure: FetchFailure,
    },
    /// Fetch attempt for an item completed
    ItemFinished {
        index: usize,
        url: String,
        platform: Platform,
        outcome: DownloadOutcome,
    },
    /// Pausing before the next item
    Waiting { delay: Duration },
    /// Batch done
    Finished { succeeded: usize, total: usize },
}
