use crate::extractor::models::{FetchRequest, MediaInfo, PostInfo, PostRequest};
use crate::utils::error::MediaError;
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// General-purpose media fetch capability
///
/// Implementations download the media named by the request and report what
/// they saved. `Ok(None)` means the tool ran but extracted nothing.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Returns a unique identifier for this fetcher (e.g. "yt-dlp")
    fn id(&self) -> &'static str;

    async fn fetch(&self, request: &FetchRequest) -> Result<Option<MediaInfo>>;
}

/// Errors raised by the specialized post downloader
#[derive(Debug, Error)]
pub enum PostError {
    #[error("content is private or requires login: {0}")]
    Restricted(String),

    #[error("content not found: {0}")]
    NotFound(String),

    #[error("rate limited by the platform: {0}")]
    RateLimited(String),

    #[error("no files were saved for {0}")]
    NothingSaved(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Specialized capability that resolves and saves a single post
#[async_trait]
pub trait PostFetcher: Send + Sync {
    fn id(&self) -> &'static str;

    async fn fetch_post(&self, request: &PostRequest) -> Result<PostInfo, PostError>;
}

/// Stand-in for a tool that could not be located at startup
///
/// Every call fails with [`MediaError::ToolNotFound`], so routing to it
/// produces an ordinary failure outcome.
#[derive(Debug, Clone, Copy)]
pub struct MissingTool(pub &'static str);

#[async_trait]
impl MediaFetcher for MissingTool {
    fn id(&self) -> &'static str {
        self.0
    }

    async fn fetch(&self, _request: &FetchRequest) -> Result<Option<MediaInfo>> {
        Err(MediaError::ToolNotFound(self.0).into())
    }
}

#[async_trait]
impl PostFetcher for MissingTool {
    fn id(&self) -> &'static str {
        self.0
    }

    async fn fetch_post(&self, _request: &PostRequest) -> Result<PostInfo, PostError> {
        Err(PostError::Other(MediaError::ToolNotFound(self.0).into()))
    }
}
