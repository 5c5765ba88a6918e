//! Download root resolution
//!
//! The root is picked once at startup from a fixed list of candidates, in order:
//! - `~/Downloads`
//! - `~/downloads`
//! - `~/storage/downloads` (Termux shared storage)
//! - `./downloads`
//!
//! The first one that already exists wins. When none exists, `./downloads` is
//! created and used.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered candidate roots for the current user and working directory
pub fn download_root_candidates() -> Vec<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut candidates = Vec::with_capacity(4);

    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join("Downloads"));
        candidates.push(home.join("downloads"));
        candidates.push(home.join("storage").join("downloads"));
    }
    candidates.push(cwd.join("downloads"));
    candidates
}

/// Resolve the download root, honouring an explicit override first
pub fn resolve_download_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create download directory {:?}", dir))?;
        return Ok(dir.to_path_buf());
    }

    let fallback = std::env::current_dir()
        .context("Failed to read current directory")?
        .join("downloads");
    pick_download_root(&download_root_candidates(), &fallback)
}

/// First existing directory among `candidates`, else `fallback` (created)
pub fn pick_download_root(candidates: &[PathBuf], fallback: &Path) -> Result<PathBuf> {
    for candidate in candidates {
        if candidate.is_dir() {
            debug!("Using download root: {:?}", candidate);
            return Ok(candidate.clone());
        }
    }

    std::fs::create_dir_all(fallback)
        .with_context(|| format!("Failed to create download directory {:?}", fallback))?;
    debug!("Created download root: {:?}", fallback);
    Ok(fallback.to_path_buf())
}
