//! Batch input files: one URL per line

use crate::utils::error::MediaError;
use std::path::{Path, PathBuf};

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(trimmed));
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(trimmed)
}

/// Trimmed, non-empty lines of `path`, in file order
pub async fn read_url_file(path: &Path) -> Result<Vec<String>, MediaError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MediaError::BatchFileNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Whether the file extension is one batch files normally use
pub fn has_list_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("csv"))
}
