//! Application configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Pause between two attempted downloads in a batch
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Number of history entries kept on disk
pub const HISTORY_CAP: usize = 100;

/// Name of the history file inside the download root
pub const HISTORY_FILE_NAME: &str = "download_history.json";

/// Cookie file handed to instaloader when present
pub const DEFAULT_COOKIE_FILE: &str = "cookies.txt";

/// Application settings
///
/// Built once at startup and passed by reference into every component that
/// needs it. The session quality lives here as the starting value only; the
/// menu owns the mutable copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Root folder; per-platform folders and the history file live under it
    pub download_root: PathBuf,

    /// Quality selected when the session starts
    pub quality: Quality,

    /// Fixed pause between attempted downloads in batch mode
    pub request_delay: Duration,

    /// Upper bound on a single fetch; `None` waits indefinitely
    pub fetch_timeout: Option<Duration>,

    /// Optional cookie file for authenticated Instagram access
    pub cookie_file: PathBuf,

    /// Explicit yt-dlp binary, otherwise discovered on PATH
    pub ytdlp_path: Option<PathBuf>,

    /// Explicit instaloader binary, otherwise discovered on PATH
    pub instaloader_path: Option<PathBuf>,
}

impl AppSettings {
    /// Settings rooted at `download_root` with every other field defaulted
    pub fn new(download_root: impl Into<PathBuf>) -> Self {
        Self {
            download_root: download_root.into(),
            quality: Quality::default(),
            request_delay: DEFAULT_REQUEST_DELAY,
            fetch_timeout: None,
            cookie_file: PathBuf::from(DEFAULT_COOKIE_FILE),
            ytdlp_path: None,
            instaloader_path: None,
        }
    }

    /// Path of the persisted download history
    pub fn history_path(&self) -> PathBuf {
        self.download_root.join(HISTORY_FILE_NAME)
    }
}

/// Video quality options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Quality {
    #[default]
    #[serde(rename = "best")]
    Best,
    #[serde(rename = "worst")]
    Worst,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
}

impl Quality {
    /// All qualities in menu order
    pub const ALL: [Quality; 6] = [
        Quality::Best,
        Quality::P1080,
        Quality::P720,
        Quality::P480,
        Quality::P360,
        Quality::Worst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::Worst => "worst",
            Quality::P1080 => "1080p",
            Quality::P720 => "720p",
            Quality::P480 => "480p",
            Quality::P360 => "360p",
        }
    }

    /// Height cap in pixels, `None` for best/worst
    pub fn height(&self) -> Option<u32> {
        match self {
            Quality::Best | Quality::Worst => None,
            Quality::P1080 => Some(1080),
            Quality::P720 => Some(720),
            Quality::P480 => Some(480),
            Quality::P360 => Some(360),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Quality::ALL
            .into_iter()
            .find(|q| q.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown quality '{}', expected one of: best, worst, 1080p, 720p, 480p, 360p",
                    s
                )
            })
    }
}
