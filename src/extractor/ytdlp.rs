//! yt-dlp wrapper for the general-purpose download strategy
//!
//! Each fetch runs one `yt-dlp` process that downloads the media and then
//! prints its info JSON (`--dump-json --no-simulate`).

use crate::extractor::models::{FetchRequest, MediaInfo};
use crate::extractor::traits::MediaFetcher;
use crate::utils::error::MediaError;
use crate::utils::tools::{find_tool, YTDLP};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, warn};

/// Media fetcher backed by the yt-dlp command-line tool
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    ytdlp_path: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(ytdlp_path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
        }
    }

    /// Locate yt-dlp (explicit path first) and build a fetcher for it
    pub fn locate(explicit: Option<&Path>) -> Result<Self, MediaError> {
        find_tool(YTDLP, explicit)
            .map(Self::new)
            .ok_or(MediaError::ToolNotFound(YTDLP))
    }

    /// Get the path to yt-dlp being used
    pub fn ytdlp_path(&self) -> &Path {
        &self.ytdlp_path
    }

    /// Command-line arguments for one request
    pub fn build_args(request: &FetchRequest) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-simulate".to_string(),
            "--no-color".to_string(),
            "--no-progress".to_string(),
            "-f".to_string(),
            request.format.clone(),
            "-o".to_string(),
            request.output_template.to_string_lossy().into_owned(),
        ];

        if request.no_playlist {
            args.push("--no-playlist".to_string());
        }
        if request.ignore_errors {
            args.push("--ignore-errors".to_string());
        }
        if let Some(container) = &request.merge_output_format {
            args.push("--merge-output-format".to_string());
            args.push(container.clone());
        }

        args.push(toggle(request.write_thumbnail, "write-thumbnail"));
        args.push(toggle(request.write_info_json, "write-info-json"));
        args.push(toggle(request.write_subtitles, "write-subs"));
        args.push(toggle(request.write_auto_subtitles, "write-auto-subs"));
        if (request.write_subtitles || request.write_auto_subtitles)
            && !request.subtitle_langs.is_empty()
        {
            args.push("--sub-langs".to_string());
            args.push(request.subtitle_langs.join(","));
        }

        // URL last, after an end-of-options marker
        args.push("--".to_string());
        args.push(request.url.clone());
        args
    }
}

/// `--name` or `--no-name`
fn toggle(on: bool, name: &str) -> String {
    if on {
        format!("--{}", name)
    } else {
        format!("--no-{}", name)
    }
}

/// Last line of `stdout` that parses as an info JSON object
pub fn parse_info_output(stdout: &str) -> Option<MediaInfo> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .find_map(|line| match serde_json::from_str::<MediaInfo>(line) {
            Ok(info) => Some(info),
            Err(e) => {
                warn!("Failed to parse yt-dlp info line: {}", e);
                None
            }
        })
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    fn id(&self) -> &'static str {
        YTDLP
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Option<MediaInfo>> {
        let args = Self::build_args(request);
        debug!("Running {:?} {:?}", self.ytdlp_path, args);

        let output = AsyncCommand::new(&self.ytdlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.ytdlp_path.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if let Some(info) = parse_info_output(&stdout) {
            if !output.status.success() {
                warn!("yt-dlp exited with {} after printing info", output.status);
            }
            return Ok(Some(info));
        }

        if output.status.success() {
            debug!("yt-dlp produced no info for {}", request.url);
            return Ok(None);
        }

        let message = last_error_line(&stderr)
            .unwrap_or_else(|| format!("exited with {}", output.status));
        error!("yt-dlp download failed: {}", stderr.trim());
        Err(MediaError::ToolFailed {
            tool: YTDLP,
            message,
        }
        .into())
    }
}

/// Most useful line of tool stderr, preferring `ERROR:` lines
pub(crate) fn last_error_line(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
}

// ============================================================
// Tests
// ============================================================
