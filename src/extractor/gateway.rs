use crate::classifier::{extract_native_id, Platform, Strategy};
use crate::extractor::models::{
    DownloadOutcome, FailureKind, FetchFailure, FetchRequest, FetchedMedia, PostRequest,
};
use crate::extractor::traits::{MediaFetcher, PostError, PostFetcher};
use crate::utils::config::{AppSettings, Quality};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

/// Height cap forced on YouTube downloads
const YOUTUBE_MAX_HEIGHT: u32 = 1080;

/// The Media Fetch Gateway
///
/// Routes one download attempt to the generic or specialized fetcher based on
/// the platform and turns whatever happens into a [`DownloadOutcome`]. Errors,
/// timeouts and panics inside a fetcher never cross this boundary.
pub struct FetchGateway {
    generic: Arc<dyn MediaFetcher>,
    specialized: Arc<dyn PostFetcher>,
    download_root: PathBuf,
    cookie_file: PathBuf,
    fetch_timeout: Option<Duration>,
}

impl FetchGateway {
    pub fn new(
        settings: &AppSettings,
        generic: Arc<dyn MediaFetcher>,
        specialized: Arc<dyn PostFetcher>,
    ) -> Self {
        Self {
            generic,
            specialized,
            download_root: settings.download_root.clone(),
            cookie_file: settings.cookie_file.clone(),
            fetch_timeout: settings.fetch_timeout,
        }
    }

    /// Output folder for a platform: `<root>/<Platform>`
    pub fn platform_dir(&self, platform: Platform) -> PathBuf {
        self.download_root.join(platform.folder_name())
    }

    /// Perform exactly one download attempt
    pub async fn download(&self, url: &str, platform: Platform, quality: Quality) -> DownloadOutcome {
        let started = Instant::now();
        let outcome: DownloadOutcome = match platform.strategy() {
            Strategy::Generic => {
                debug!("Routing {} to fetcher: {}", url, self.generic.id());
                self.run_generic(url, platform, quality).await.into()
            }
            Strategy::Specialized => {
                debug!("Routing {} to fetcher: {}", url, self.specialized.id());
                self.run_specialized(url, platform).await.into()
            }
        };

        match &outcome {
            DownloadOutcome::Success(media) => info!(
                "Downloaded {} from {} in {:.2}s: {}",
                url,
                platform,
                started.elapsed().as_secs_f64(),
                media.title
            ),
            DownloadOutcome::Failure(failure) => {
                warn!("Download of {} from {} failed: {}", url, platform, failure)
            }
        }
        outcome
    }

    /// Typed option set for the generic fetcher
    pub fn build_request(
        &self,
        url: &str,
        platform: Platform,
        quality: Quality,
        output_dir: &Path,
    ) -> FetchRequest {
        let mut request = FetchRequest::new(url, output_dir.join("%(title)s.%(ext)s"));
        request.format = format_selector(platform, quality);
        if platform == Platform::YouTube {
            request.merge_output_format = Some("mp4".to_string());
        }
        request
    }

    async fn run_generic(
        &self,
        url: &str,
        platform: Platform,
        quality: Quality,
    ) -> Result<FetchedMedia, FetchFailure> {
        let output_dir = self.ensure_platform_dir(platform).await?;
        let request = self.build_request(url, platform, quality, &output_dir);

        let fetcher = Arc::clone(&self.generic);
        let info = self
            .isolate(async move { fetcher.fetch(&request).await })
            .await?
            .map_err(|e| FetchFailure::internal(format!("{:#}", e)))?;

        info.map(FetchedMedia::from).ok_or_else(|| {
            FetchFailure::new(
                FailureKind::NothingExtracted,
                "Failed to extract video information",
            )
        })
    }

    async fn run_specialized(&self, url: &str, platform: Platform) -> Result<FetchedMedia, FetchFailure> {
        let shortcode = extract_native_id(url, platform).ok_or_else(|| {
            FetchFailure::new(
                FailureKind::ContentIdNotFound,
                format!("Could not identify {} content from URL", platform),
            )
        })?;
        let target_dir = self.ensure_platform_dir(platform).await?;
        let request = PostRequest {
            shortcode: shortcode.clone(),
            target_dir,
            cookie_file: self.cookie_file.is_file().then(|| self.cookie_file.clone()),
        };
        info!("Downloading {} post: {}", platform, shortcode);

        let fetcher = Arc::clone(&self.specialized);
        let post = self
            .isolate(async move { fetcher.fetch_post(&request).await })
            .await?
            .map_err(post_failure)?;

        Ok(FetchedMedia {
            title: post.title.unwrap_or(shortcode),
            duration: None,
            size: post.total_size,
            filename: post.files.into_iter().next(),
        })
    }

    async fn ensure_platform_dir(&self, platform: Platform) -> Result<PathBuf, FetchFailure> {
        let dir = self.platform_dir(platform);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            FetchFailure::internal(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        Ok(dir)
    }

    /// Run a fetch on its own task, bounded by the configured timeout
    ///
    /// The task is aborted if this future is dropped before it finishes.
    async fn isolate<T, F>(&self, fetch: F) -> Result<T, FetchFailure>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        let handle = tokio::spawn(fetch);
        let _abort = AbortOnDrop(handle.abort_handle());

        let joined = match self.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    return Err(FetchFailure::new(
                        FailureKind::TimedOut,
                        format!("Fetch did not finish within {}s", limit.as_secs_f64()),
                    ));
                }
            },
            None => handle.await,
        };

        joined.map_err(|e| {
            if e.is_panic() {
                FetchFailure::internal("Fetcher crashed unexpectedly")
            } else {
                FetchFailure::internal(format!("Fetch task was cancelled: {}", e))
            }
        })
    }
}

/// Aborts the fetch task when the waiting side goes away
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Format selector for a platform and quality
///
/// Heights become a capped best-video-plus-audio selector. YouTube is always
/// capped at 1080p, so `best` there means "best up to 1080p".
pub fn format_selector(platform: Platform, quality: Quality) -> String {
    let height = match (platform, quality) {
        (_, Quality::Worst) => return "worst".to_string(),
        (Platform::YouTube, q) => Some(q.height().unwrap_or(YOUTUBE_MAX_HEIGHT).min(YOUTUBE_MAX_HEIGHT)),
        (_, q) => q.height(),
    };

    match height {
        Some(h) => format!("bestvideo[height<={h}]+bestaudio/best[height<={h}]"),
        None => "best".to_string(),
    }
}

fn post_failure(error: PostError) -> FetchFailure {
    match error {
        PostError::Restricted(msg) => FetchFailure::new(
            FailureKind::AccessRestricted,
            format!("Access denied, the content may be private ({})", msg),
        ),
        PostError::NotFound(msg) => {
            FetchFailure::new(FailureKind::ContentNotFound, format!("Content not found ({})", msg))
        }
        PostError::RateLimited(msg) => FetchFailure::new(
            FailureKind::RateLimited,
            format!("Rate limited, try again later ({})", msg),
        ),
        PostError::NothingSaved(shortcode) => FetchFailure::new(
            FailureKind::NothingExtracted,
            format!("Nothing was downloaded for post {}", shortcode),
        ),
        PostError::Other(e) => FetchFailure::internal(format!("{:#}", e)),
    }
}
