//! Data structures exchanged with the fetch tools and returned by the gateway

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Everything the general-purpose fetch tool needs for one download
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub url: String,
    /// Output path template, e.g. `<root>/Youtube/%(title)s.%(ext)s`
    pub output_template: PathBuf,
    /// Format selector expression
    pub format: String,
    /// Container to merge separate video/audio streams into
    pub merge_output_format: Option<String>,
    pub write_thumbnail: bool,
    pub write_info_json: bool,
    pub write_subtitles: bool,
    pub write_auto_subtitles: bool,
    pub subtitle_langs: Vec<String>,
    /// Download only the linked item even if the URL names a playlist
    pub no_playlist: bool,
    /// Keep going on per-item errors instead of aborting
    pub ignore_errors: bool,
}

impl FetchRequest {
    /// Request with the standard sidecar options and `best` format
    pub fn new(url: impl Into<String>, output_template: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            output_template: output_template.into(),
            format: "best".to_string(),
            merge_output_format: None,
            write_thumbnail: true,
            write_info_json: true,
            write_subtitles: false,
            write_auto_subtitles: false,
            subtitle_langs: vec!["en".to_string()],
            no_playlist: true,
            ignore_errors: true,
        }
    }
}

/// Info JSON printed by the fetch tool after a download
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub filename: Option<PathBuf>,
    #[serde(default, rename = "_filename")]
    pub legacy_filename: Option<PathBuf>,
    #[serde(default)]
    pub requested_downloads: Vec<RequestedDownload>,
}

/// One file written for a download (merged output when streams were joined)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestedDownload {
    #[serde(default)]
    pub filepath: Option<PathBuf>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_approx: Option<u64>,
}

impl MediaInfo {
    /// Final on-disk file, preferring the post-merge path
    pub fn output_file(&self) -> Option<PathBuf> {
        self.requested_downloads
            .iter()
            .find_map(|d| d.filepath.clone())
            .or_else(|| self.filename.clone())
            .or_else(|| self.legacy_filename.clone())
    }

    /// Best known size in bytes
    pub fn size(&self) -> Option<u64> {
        self.filesize
            .or_else(|| {
                self.requested_downloads
                    .iter()
                    .find_map(|d| d.filesize.or(d.filesize_approx))
            })
            .or(self.filesize_approx)
    }
}

/// Request handed to the specialized post downloader
#[derive(Debug, Clone, PartialEq)]
pub struct PostRequest {
    /// Platform-native content id (Instagram shortcode)
    pub shortcode: String,
    /// Folder the post files are written to
    pub target_dir: PathBuf,
    /// Session cookies for authenticated access
    pub cookie_file: Option<PathBuf>,
}

/// What the specialized downloader saved
#[derive(Debug, Clone, Default)]
pub struct PostInfo {
    pub title: Option<String>,
    pub files: Vec<PathBuf>,
    pub total_size: Option<u64>,
}

/// Successful download summary
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedMedia {
    pub title: String,
    /// Media length in seconds
    pub duration: Option<f64>,
    /// Size in bytes
    pub size: Option<u64>,
    pub filename: Option<PathBuf>,
}

impl From<MediaInfo> for FetchedMedia {
    fn from(info: MediaInfo) -> Self {
        Self {
            title: info.title.clone().unwrap_or_else(|| "Unknown".to_string()),
            duration: info.duration,
            size: info.size(),
            filename: info.output_file(),
        }
    }
}

/// Closed set of reasons a download attempt can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    UndetectedPlatform,
    NothingExtracted,
    ContentIdNotFound,
    AccessRestricted,
    ContentNotFound,
    RateLimited,
    TimedOut,
    Internal,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidUrl => "invalid URL",
            FailureKind::UndetectedPlatform => "undetectable platform",
            FailureKind::NothingExtracted => "nothing extracted",
            FailureKind::ContentIdNotFound => "content id not found",
            FailureKind::AccessRestricted => "access restricted",
            FailureKind::ContentNotFound => "content not found",
            FailureKind::RateLimited => "rate limited",
            FailureKind::TimedOut => "timed out",
            FailureKind::Internal => "internal error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure kind plus a message fit for the user
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn internal(error: impl fmt::Display) -> Self {
        Self::new(FailureKind::Internal, error.to_string())
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

/// Result of exactly one download attempt
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    Success(FetchedMedia),
    Failure(FetchFailure),
}

impl DownloadOutcome {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        DownloadOutcome::Failure(FetchFailure::new(kind, message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success(_))
    }

    pub fn media(&self) -> Option<&FetchedMedia> {
        match self {
            DownloadOutcome::Success(media) => Some(media),
            DownloadOutcome::Failure(_) => None,
        }
    }

    pub fn failure_info(&self) -> Option<&FetchFailure> {
        match self {
            DownloadOutcome::Success(_) => None,
            DownloadOutcome::Failure(failure) => Some(failure),
        }
    }

    /// Bare file name of the output, for the history record
    pub fn file_name(&self) -> Option<String> {
        self.media()?
            .filename
            .as_ref()?
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

impl From<Result<FetchedMedia, FetchFailure>> for DownloadOutcome {
    fn from(result: Result<FetchedMedia, FetchFailure>) -> Self {
        match result {
            Ok(media) => DownloadOutcome::Success(media),
            Err(failure) => DownloadOutcome::Failure(failure),
        }
    }
}
