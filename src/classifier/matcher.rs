//! Host and path matching for media URLs

use crate::classifier::platform::Platform;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^https?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?",
        r"|localhost",
        r"|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .expect("URL pattern is valid")
});

static INSTAGRAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:p|reel|tv)/([A-Za-z0-9_-]+)").expect("pattern is valid"));
static TIKTOK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/video/(\d+)").expect("pattern is valid"));
static TWITTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/status/(\d+)").expect("pattern is valid"));

/// True iff `url` is an absolute http(s) URL with a plausible host
pub fn validate(url: &str) -> bool {
    URL_RE.is_match(url)
}

/// Platform owning the URL's host, first match in table order
pub fn detect_platform(url: &str) -> Option<Platform> {
    let host = host_of(url)?;
    let platform = Platform::SUPPORTED.into_iter().find(|platform| {
        platform
            .domains()
            .iter()
            .any(|domain| host_matches(&host, domain))
    });
    debug!("Detected platform {:?} for host {}", platform, host);
    platform
}

/// Platform-native content identifier, used for naming and logging
pub fn extract_native_id(url: &str, platform: Platform) -> Option<String> {
    match platform {
        Platform::YouTube => youtube_id(url),
        Platform::Instagram => capture(&INSTAGRAM_RE, url),
        Platform::TikTok => capture(&TIKTOK_RE, url),
        Platform::Twitter => capture(&TWITTER_RE, url),
        Platform::Facebook | Platform::Reddit | Platform::Twitch | Platform::Other => None,
    }
}

fn parse(url: &str) -> Option<url::Url> {
    match url::Url::parse(url) {
        Ok(parsed) => Some(parsed),
        // bare "youtube.com/watch?v=..." style input
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse(&format!("https://{}", url)).ok()
        }
        Err(_) => None,
    }
}

fn host_of(url: &str) -> Option<String> {
    let parsed = parse(url.trim())?;
    let host = parsed.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    (!host.is_empty()).then_some(host)
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn youtube_id(url: &str) -> Option<String> {
    let parsed = parse(url.trim())?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let mut segments = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter();

    if host_matches(&host, "youtu.be") {
        return segments.next().map(str::to_string);
    }

    if let Some(v) = parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|v| !v.is_empty())
    {
        return Some(v);
    }

    match segments.next() {
        Some("shorts") | Some("live") | Some("embed") => segments.next().map(str::to_string),
        _ => None,
    }
}

fn capture(re: &Regex, url: &str) -> Option<String> {
    re.captures(url)?.get(1).map(|m| m.as_str().to_string())
}
