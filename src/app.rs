//! Application initialization and session state

use crate::batch::{BatchEvent, BatchReport, BatchRunner};
use crate::classifier::{validate, Platform};
use crate::extractor::{
    DownloadOutcome, FailureKind, FetchGateway, InstaloaderFetcher, MediaFetcher, MissingTool,
    PostFetcher, YtDlpFetcher,
};
use crate::history::{DownloadRecord, HistoryStore};
use crate::utils::config::{AppSettings, Quality};
use crate::utils::tools::{INSTALOADER, YTDLP};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Locate both fetch tools; a missing tool becomes a [`MissingTool`]
pub fn locate_fetchers(settings: &AppSettings) -> (Arc<dyn MediaFetcher>, Arc<dyn PostFetcher>) {
    let generic: Arc<dyn MediaFetcher> = match YtDlpFetcher::locate(settings.ytdlp_path.as_deref()) {
        Ok(fetcher) => {
            info!("yt-dlp found at: {}", fetcher.ytdlp_path().display());
            Arc::new(fetcher)
        }
        Err(e) => {
            warn!("{}; downloads through yt-dlp will fail", e);
            Arc::new(MissingTool(YTDLP))
        }
    };

    let specialized: Arc<dyn PostFetcher> =
        match InstaloaderFetcher::locate(settings.instaloader_path.as_deref()) {
            Ok(fetcher) => Arc::new(fetcher),
            Err(e) => {
                warn!("{}; Instagram downloads will fail", e);
                Arc::new(MissingTool(INSTALOADER))
            }
        };

    (generic, specialized)
}

/// One interactive or headless session
///
/// Owns the current quality selection and the history store; every download
/// made through the session is recorded.
pub struct Session {
    settings: AppSettings,
    quality: Quality,
    gateway: Arc<FetchGateway>,
    runner: BatchRunner,
    history: HistoryStore,
}

impl Session {
    pub async fn new(
        settings: AppSettings,
        generic: Arc<dyn MediaFetcher>,
        specialized: Arc<dyn PostFetcher>,
    ) -> Self {
        let gateway = Arc::new(FetchGateway::new(&settings, generic, specialized));
        let runner = BatchRunner::new(Arc::clone(&gateway), settings.request_delay);
        let history = HistoryStore::open(settings.history_path()).await;

        Self {
            quality: settings.quality,
            settings,
            gateway,
            runner,
            history,
        }
    }

    /// Session backed by the real command-line tools
    pub async fn start(settings: AppSettings) -> Self {
        let (generic, specialized) = locate_fetchers(&settings);
        Self::new(settings, generic, specialized).await
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn set_quality(&mut self, quality: Quality) {
        info!("Quality set to: {}", quality);
        self.quality = quality;
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Download a single URL with the current quality and record it
    pub async fn download_one(&mut self, url: &str, platform: Platform) -> DownloadOutcome {
        let outcome = if validate(url) {
            self.gateway.download(url, platform, self.quality).await
        } else {
            DownloadOutcome::failure(FailureKind::InvalidUrl, format!("Invalid URL: {}", url))
        };

        self.history
            .append(DownloadRecord::from_outcome(url, platform, &outcome))
            .await;
        outcome
    }

    /// Run a batch with the current quality
    pub async fn download_batch(
        &mut self,
        urls: &[String],
        platform_override: Option<Platform>,
        events: Option<mpsc::UnboundedSender<BatchEvent>>,
    ) -> BatchReport {
        self.runner
            .run(urls, platform_override, self.quality, &mut self.history, events)
            .await
    }
}
