//! instaloader wrapper for Instagram posts
//!
//! Posts are fetched by shortcode with `instaloader -- -<shortcode>`, which
//! resolves the post and writes its media straight into the target folder.

use crate::extractor::models::{PostInfo, PostRequest};
use crate::extractor::traits::{PostError, PostFetcher};
use crate::extractor::ytdlp::last_error_line;
use crate::utils::error::MediaError;
use crate::utils::tools::{find_tool, INSTALOADER};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, warn};

/// Post fetcher backed by the instaloader command-line tool
#[derive(Debug, Clone)]
pub struct InstaloaderFetcher {
    path: PathBuf,
}

impl InstaloaderFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn locate(explicit: Option<&Path>) -> Result<Self, MediaError> {
        find_tool(INSTALOADER, explicit)
            .map(Self::new)
            .ok_or(MediaError::ToolNotFound(INSTALOADER))
    }

    pub fn build_args(request: &PostRequest) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "--no-metadata-json".to_string(),
            "--no-compress-json".to_string(),
            "--dirname-pattern".to_string(),
            request.target_dir.to_string_lossy().into_owned(),
            "--filename-pattern".to_string(),
            "{shortcode}".to_string(),
        ];
        if let Some(cookies) = &request.cookie_file {
            args.push("--cookiefile".to_string());
            args.push(cookies.to_string_lossy().into_owned());
        }
        args.push("--".to_string());
        args.push(format!("-{}", request.shortcode));
        args
    }
}

/// Map instaloader's stderr to the post error categories
pub fn classify_failure(stderr: &str) -> PostError {
    let message = last_error_line(stderr).unwrap_or_else(|| "instaloader failed".to_string());
    let lower = stderr.to_lowercase();

    if lower.contains("429")
        || lower.contains("too many requests")
        || lower.contains("please wait a few minutes")
    {
        PostError::RateLimited(message)
    } else if lower.contains("private")
        || lower.contains("login required")
        || lower.contains("login_required")
        || lower.contains("401 unauthorized")
        || lower.contains("403 forbidden")
    {
        PostError::Restricted(message)
    } else if lower.contains("not found")
        || lower.contains("does not exist")
        || lower.contains("404")
    {
        PostError::NotFound(message)
    } else {
        PostError::Other(anyhow!(message))
    }
}

/// Whether `file_name` belongs to the post: `<shortcode>` followed by `.` or `_`
fn is_post_file(file_name: &str, shortcode: &str) -> bool {
    file_name
        .strip_prefix(shortcode)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.') || rest.starts_with('_'))
}

/// Files instaloader wrote for `shortcode`
async fn collect_post_files(target_dir: &Path, shortcode: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(target_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| is_post_file(n, shortcode));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[async_trait]
impl PostFetcher for InstaloaderFetcher {
    fn id(&self) -> &'static str {
        INSTALOADER
    }

    async fn fetch_post(&self, request: &PostRequest) -> Result<PostInfo, PostError> {
        let args = Self::build_args(request);
        debug!("Running {:?} {:?}", self.path, args);

        let output = AsyncCommand::new(&self.path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("instaloader failed for {}: {}", request.shortcode, stderr.trim());
            return Err(classify_failure(&stderr));
        }

        let files = match collect_post_files(&request.target_dir, &request.shortcode).await {
            Ok(files) => files,
            Err(e) => {
                warn!("Could not list {:?}: {}", request.target_dir, e);
                Vec::new()
            }
        };
        if files.is_empty() {
            warn!("instaloader saved nothing for {}", request.shortcode);
            return Err(PostError::NothingSaved(request.shortcode.clone()));
        }

        let mut total_size = 0u64;
        for file in &files {
            if let Ok(meta) = tokio::fs::metadata(file).await {
                total_size += meta.len();
            }
        }

        Ok(PostInfo {
            title: None,
            total_size: Some(total_size),
            files,
        })
    }
}
