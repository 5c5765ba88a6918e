//! Supported media platforms

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Media-hosting service a URL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Instagram,
    TikTok,
    Twitter,
    Facebook,
    Reddit,
    Twitch,
    Other,
}

/// Which gateway strategy serves a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// General-purpose fetch tool with per-platform options
    Generic,
    /// Dedicated post downloader
    Specialized,
}

impl Platform {
    /// Platforms that detection can produce, in detection order
    pub const SUPPORTED: [Platform; 7] = [
        Platform::YouTube,
        Platform::Instagram,
        Platform::TikTok,
        Platform::Twitter,
        Platform::Facebook,
        Platform::Reddit,
        Platform::Twitch,
    ];

    /// Lowercase tag, as stored in the history file
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
            Platform::Reddit => "reddit",
            Platform::Twitch => "twitch",
            Platform::Other => "other",
        }
    }

    /// Capitalized tag used for the per-platform output folder
    pub fn folder_name(&self) -> String {
        let tag = self.as_str();
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Registrable domains owned by the platform
    pub fn domains(&self) -> &'static [&'static str] {
        match self {
            Platform::YouTube => &["youtube.com", "youtu.be"],
            Platform::Instagram => &["instagram.com"],
            Platform::TikTok => &["tiktok.com"],
            Platform::Twitter => &["twitter.com", "x.com"],
            Platform::Facebook => &["facebook.com"],
            Platform::Reddit => &["reddit.com"],
            Platform::Twitch => &["twitch.tv"],
            Platform::Other => &[],
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Platform::Instagram => Strategy::Specialized,
            Platform::YouTube
            | Platform::TikTok
            | Platform::Twitter
            | Platform::Facebook
            | Platform::Reddit
            | Platform::Twitch
            | Platform::Other => Strategy::Generic,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "youtube" => Ok(Platform::YouTube),
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::TikTok),
            "twitter" | "x" => Ok(Platform::Twitter),
            "facebook" => Ok(Platform::Facebook),
            "reddit" => Ok(Platform::Reddit),
            "twitch" => Ok(Platform::Twitch),
            "other" => Ok(Platform::Other),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}
