//! Fetch gateway routing and failure isolation, using fake tools

mod common;

use common::{settings, Behavior, FakeFetcher, FakePostFetcher};
use media_dw::classifier::Platform;
use media_dw::extractor::{
    DownloadOutcome, FailureKind, FetchGateway, PostError, PostInfo, PostRequest,
};
use media_dw::utils::Quality;
use std::time::Duration;
use tempfile::TempDir;

type PostResult = fn(&PostRequest) -> Result<PostInfo, PostError>;

fn gateway(
    temp: &TempDir,
    generic: std::sync::Arc<FakeFetcher>,
    specialized: std::sync::Arc<FakePostFetcher>,
) -> FetchGateway {
    FetchGateway::new(&settings(temp.path()), generic, specialized)
}

fn kind(outcome: &DownloadOutcome) -> FailureKind {
    outcome.failure_info().expect("expected a failure").kind
}

#[tokio::test]
async fn generic_success_creates_platform_folder() {
    let temp = TempDir::new().expect("temp dir");
    let fetcher = FakeFetcher::new(Behavior::Succeed);
    let gw = gateway(&temp, fetcher.clone(), FakePostFetcher::saving());

    let outcome = gw
        .download("https://www.youtube.com/watch?v=abc", Platform::YouTube, Quality::P720)
        .await;

    let media = outcome.media().expect("success");
    assert_eq!(media.title, "Sample Clip");
    assert_eq!(media.size, Some(2048));
    assert!(temp.path().join("Youtube").is_dir());

    let requests = fetcher.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].format,
        "bestvideo[height<=720]+bestaudio/best[height<=720]"
    );
    assert_eq!(requests[0].merge_output_format.as_deref(), Some("mp4"));
    assert_eq!(
        requests[0].output_template,
        temp.path().join("Youtube").join("%(title)s.%(ext)s")
    );
}

#[tokio::test]
async fn generic_errors_become_failures() {
    let temp = TempDir::new().expect("temp dir");

    let failing = gateway(&temp, FakeFetcher::new(Behavior::Fail), FakePostFetcher::saving());
    let outcome = failing
        .download("https://vm.tiktok.com/xyz", Platform::TikTok, Quality::Best)
        .await;
    assert_eq!(kind(&outcome), FailureKind::Internal);
    assert!(outcome.failure_info().unwrap().message.contains("Unsupported URL"));

    let empty = gateway(&temp, FakeFetcher::new(Behavior::Nothing), FakePostFetcher::saving());
    let outcome = empty
        .download("https://example.com/v", Platform::Other, Quality::Best)
        .await;
    assert_eq!(kind(&outcome), FailureKind::NothingExtracted);
}

#[tokio::test]
async fn panicking_fetcher_is_contained() {
    let temp = TempDir::new().expect("temp dir");
    let gw = gateway(&temp, FakeFetcher::new(Behavior::Panic), FakePostFetcher::saving());

    let outcome = gw
        .download("https://x.com/a/status/1", Platform::Twitter, Quality::Best)
        .await;
    assert_eq!(kind(&outcome), FailureKind::Internal);
}

#[tokio::test]
async fn slow_fetch_times_out() {
    let temp = TempDir::new().expect("temp dir");
    let mut settings = settings(temp.path());
    settings.fetch_timeout = Some(Duration::from_millis(50));
    let fetcher = FakeFetcher::new(Behavior::Hang);
    let gw = FetchGateway::new(&settings, fetcher.clone(), FakePostFetcher::saving());

    let outcome = gw
        .download("https://www.reddit.com/r/a/comments/b", Platform::Reddit, Quality::Best)
        .await;
    assert_eq!(kind(&outcome), FailureKind::TimedOut);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(fetcher.was_abandoned());
}

#[tokio::test]
async fn dropping_a_download_aborts_the_fetch() {
    let temp = TempDir::new().expect("temp dir");
    let fetcher = FakeFetcher::new(Behavior::Hang);
    let gw = gateway(&temp, fetcher.clone(), FakePostFetcher::saving());

    let download = gw.download("https://vimeo.com/5", Platform::Other, Quality::Best);
    let result = tokio::time::timeout(Duration::from_millis(50), download).await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(fetcher.urls().len(), 1);
    assert!(fetcher.was_abandoned());
}

#[tokio::test]
async fn instagram_without_shortcode_never_reaches_fetcher() {
    let temp = TempDir::new().expect("temp dir");
    let posts = FakePostFetcher::saving();
    let gw = gateway(&temp, FakeFetcher::new(Behavior::Succeed), posts.clone());

    let outcome = gw
        .download("https://www.instagram.com/someuser/", Platform::Instagram, Quality::Best)
        .await;
    assert_eq!(kind(&outcome), FailureKind::ContentIdNotFound);
    assert!(posts.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn instagram_post_uses_shortcode_and_existing_cookies() {
    let temp = TempDir::new().expect("temp dir");
    let posts = FakePostFetcher::saving();
    let gw = gateway(&temp, FakeFetcher::new(Behavior::Fail), posts.clone());

    let outcome = gw
        .download("https://www.instagram.com/reel/Cx1_ab-Z/", Platform::Instagram, Quality::Best)
        .await;
    let media = outcome.media().expect("success");
    assert_eq!(media.title, "Cx1_ab-Z");
    assert_eq!(media.size, Some(4096));

    std::fs::write(temp.path().join("cookies.txt"), "# Netscape HTTP Cookie File\n")
        .expect("write cookies");
    gw.download("https://instagram.com/p/Second1/", Platform::Instagram, Quality::Best)
        .await;

    let requests = posts.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].shortcode, "Cx1_ab-Z");
    assert_eq!(requests[0].target_dir, temp.path().join("Instagram"));
    assert_eq!(requests[0].cookie_file, None);
    assert_eq!(requests[1].cookie_file, Some(temp.path().join("cookies.txt")));
}

#[tokio::test]
async fn instagram_errors_map_to_kinds() {
    let temp = TempDir::new().expect("temp dir");
    let cases: [(PostResult, FailureKind); 4] = [
        (
            |_| Err(PostError::Restricted("login required".into())),
            FailureKind::AccessRestricted,
        ),
        (
            |_| Err(PostError::NotFound("404".into())),
            FailureKind::ContentNotFound,
        ),
        (
            |_| Err(PostError::RateLimited("429".into())),
            FailureKind::RateLimited,
        ),
        (
            |req| Err(PostError::NothingSaved(req.shortcode.clone())),
            FailureKind::NothingExtracted,
        ),
    ];

    for (result, expected) in cases {
        let gw = gateway(&temp, FakeFetcher::new(Behavior::Fail), FakePostFetcher::new(result));
        let outcome = gw
            .download("https://www.instagram.com/p/ABC123/", Platform::Instagram, Quality::Best)
            .await;
        assert_eq!(kind(&outcome), expected);
    }
}
