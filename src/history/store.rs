//! Download history persistence
//!
//! The whole sequence is rewritten on every append. Writes go to a sibling
//! `.tmp` file that is then renamed over the history file, so a failed write
//! leaves the previous content intact.

use crate::classifier::Platform;
use crate::extractor::DownloadOutcome;
use crate::utils::config::HISTORY_CAP;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// One past download attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRecord {
    /// Local time of the attempt, ISO-8601 without offset
    pub timestamp: NaiveDateTime,
    pub url: String,
    pub platform: Platform,
    pub success: bool,
    pub filename: Option<String>,
}

impl DownloadRecord {
    pub fn new(
        url: impl Into<String>,
        platform: Platform,
        success: bool,
        filename: Option<String>,
    ) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            url: url.into(),
            platform,
            success,
            filename,
        }
    }

    /// Record for a finished attempt
    pub fn from_outcome(url: &str, platform: Platform, outcome: &DownloadOutcome) -> Self {
        Self::new(url, platform, outcome.is_success(), outcome.file_name())
    }
}

/// Capped, persisted sequence of download records (oldest first)
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<DownloadRecord>,
}

impl HistoryStore {
    /// Load the history at `path`; a missing or unreadable file starts empty
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match fs::read_to_string(&path).await {
            Ok(json) => match serde_json::from_str::<Vec<DownloadRecord>>(&json) {
                Ok(mut records) => {
                    truncate_front(&mut records);
                    records
                }
                Err(e) => {
                    warn!("Ignoring unreadable history file {:?}: {}", path, e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Failed to read history file {:?}: {}", path, e);
                Vec::new()
            }
        };
        debug!("Loaded {} history records from {:?}", records.len(), path);

        Self { path, records }
    }

    /// All records, oldest first
    pub fn records(&self) -> &[DownloadRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record, evict beyond the cap and persist
    ///
    /// Persistence errors are logged; the in-memory sequence is updated
    /// either way.
    pub async fn append(&mut self, record: DownloadRecord) {
        self.records.push(record);
        truncate_front(&mut self.records);

        if let Err(e) = self.persist().await {
            warn!("Error saving history: {:#}", e);
        }
    }

    /// Last `n` records, newest first
    pub fn recent(&self, n: usize) -> Vec<&DownloadRecord> {
        self.records.iter().rev().take(n).collect()
    }

    async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let json =
            serde_json::to_string_pretty(&self.records).context("Failed to serialize history")?;
        let temp_path = self.path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)
            .await
            .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;
        file.write_all(json.as_bytes())
            .await
            .context("Failed to write history")?;
        file.sync_all().await.context("Failed to sync history")?;
        drop(file);

        fs::rename(&temp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace {:?}", self.path))?;
        Ok(())
    }
}

fn truncate_front(records: &mut Vec<DownloadRecord>) {
    if records.len() > HISTORY_CAP {
        let excess = records.len() - HISTORY_CAP;
        records.drain(..excess);
    }
}
