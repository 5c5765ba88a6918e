//! Fake fetch tools shared by the integration tests

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use media_dw::extractor::{
    FetchRequest, MediaFetcher, MediaInfo, PostError, PostFetcher, PostInfo, PostRequest,
};
use media_dw::utils::AppSettings;
use media_dw::Session;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a fake fetcher answers every call
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Succeed,
    Nothing,
    Fail,
    Panic,
    Hang,
}

/// Generic fetcher that records the requests it receives
pub struct FakeFetcher {
    behavior: Behavior,
    pub requests: Mutex<Vec<FetchRequest>>,
    /// Set once a hanging fetch has been dropped
    pub abandoned: AtomicBool,
}

struct SetOnDrop<'a>(&'a AtomicBool);

impl Drop for SetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl FakeFetcher {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            requests: Mutex::new(Vec::new()),
            abandoned: AtomicBool::new(false),
        })
    }

    pub fn was_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }

    pub fn formats(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.format.clone())
            .collect()
    }
}

#[async_trait]
impl MediaFetcher for FakeFetcher {
    fn id(&self) -> &'static str {
        "fake"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Option<MediaInfo>> {
        self.requests.lock().unwrap().push(request.clone());
        match self.behavior {
            Behavior::Succeed => Ok(Some(MediaInfo {
                id: Some("abc".into()),
                title: Some("Sample Clip".into()),
                duration: Some(12.0),
                filesize: Some(2048),
                filename: Some(request.output_template.with_file_name("Sample Clip.mp4")),
                ..Default::default()
            })),
            Behavior::Nothing => Ok(None),
            Behavior::Fail => Err(anyhow!("ERROR: Unsupported URL")),
            Behavior::Panic => panic!("fetcher blew up"),
            Behavior::Hang => {
                let _flag = SetOnDrop(&self.abandoned);
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }
}

/// Post fetcher that records shortcodes
pub struct FakePostFetcher {
    result: fn(&PostRequest) -> Result<PostInfo, PostError>,
    pub requests: Mutex<Vec<PostRequest>>,
}

impl FakePostFetcher {
    pub fn new(result: fn(&PostRequest) -> Result<PostInfo, PostError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn saving() -> Arc<Self> {
        Self::new(|req| {
            Ok(PostInfo {
                title: None,
                files: vec![req.target_dir.join(format!("{}.jpg", req.shortcode))],
                total_size: Some(4096),
            })
        })
    }
}

#[async_trait]
impl PostFetcher for FakePostFetcher {
    fn id(&self) -> &'static str {
        "fake-post"
    }

    async fn fetch_post(&self, request: &PostRequest) -> Result<PostInfo, PostError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.result)(request)
    }
}

/// Settings rooted in a temp dir with no batch pacing delay
pub fn settings(root: &Path) -> AppSettings {
    let mut settings = AppSettings::new(root);
    settings.request_delay = Duration::ZERO;
    settings.cookie_file = root.join("cookies.txt");
    settings
}

pub async fn session(
    settings: AppSettings,
    generic: Arc<FakeFetcher>,
    specialized: Arc<FakePostFetcher>,
) -> Session {
    Session::new(settings, generic, specialized).await
}
