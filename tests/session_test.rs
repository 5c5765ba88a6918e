//! Session, batch and history behavior without touching the network

mod common;

use common::{session, settings, Behavior, FakeFetcher, FakePostFetcher};
use media_dw::batch::BatchEvent;
use media_dw::classifier::Platform;
use media_dw::extractor::FailureKind;
use media_dw::history::{DownloadRecord, HistoryStore};
use media_dw::utils::{Quality, HISTORY_CAP};
use tempfile::TempDir;
use tokio::sync::mpsc;

#[tokio::test]
async fn history_keeps_most_recent_hundred() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("download_history.json");

    let mut store = HistoryStore::open(&path).await;
    for i in 0..=HISTORY_CAP {
        store
            .append(DownloadRecord::new(
                format!("https://example.com/{}", i),
                Platform::Other,
                i % 2 == 0,
                None,
            ))
            .await;
    }
    assert_eq!(store.len(), HISTORY_CAP);
    assert_eq!(store.records()[0].url, "https://example.com/1");

    let reloaded = HistoryStore::open(&path).await;
    assert_eq!(reloaded.len(), HISTORY_CAP);
    assert_eq!(reloaded.records(), store.records());
    assert_eq!(
        reloaded.recent(1)[0].url,
        format!("https://example.com/{}", HISTORY_CAP)
    );
}

#[tokio::test]
async fn history_survives_bad_file() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("download_history.json");
    std::fs::write(&path, "{ not json").expect("write");

    let mut store = HistoryStore::open(&path).await;
    assert!(store.is_empty());

    store
        .append(DownloadRecord::new("https://youtu.be/a", Platform::YouTube, true, Some("a.mp4".into())))
        .await;
    let text = std::fs::read_to_string(&path).expect("read");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value[0]["platform"], "youtube");
    assert_eq!(value[0]["filename"], "a.mp4");
}

#[tokio::test]
async fn batch_runs_in_order_and_records_everything() {
    let temp = TempDir::new().expect("temp dir");
    let fetcher = FakeFetcher::new(Behavior::Succeed);
    let mut session = session(settings(temp.path()), fetcher.clone(), FakePostFetcher::saving()).await;

    let urls = vec![
        "not a url".to_string(),
        "https://www.youtube.com/watch?v=abc".to_string(),
        "https://unknown-site.org/video".to_string(),
    ];
    let (tx, mut rx) = mpsc::unbounded_channel();
    let report = session.download_batch(&urls, None, Some(tx)).await;

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(fetcher.urls(), ["https://www.youtube.com/watch?v=abc"]);
    assert_eq!(report.total(), 3);
    assert_eq!(report.attempted(), 1);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(
        report.items[0].outcome.failure_info().unwrap().kind,
        FailureKind::InvalidUrl
    );
    assert_eq!(
        report.items[2].outcome.failure_info().unwrap().kind,
        FailureKind::UndetectedPlatform
    );

    let waits = events
        .iter()
        .filter(|e| matches!(e, BatchEvent::Waiting { .. }))
        .count();
    assert_eq!(waits, 1);
    assert_eq!(
        events.last(),
        Some(&BatchEvent::Finished {
            succeeded: 1,
            total: 3
        })
    );

    let history = session.history().records();
    assert_eq!(history.len(), 3);
    let recorded: Vec<(Platform, bool)> = history.iter().map(|r| (r.platform, r.success)).collect();
    assert_eq!(
        recorded,
        [
            (Platform::Other, false),
            (Platform::YouTube, true),
            (Platform::Other, false)
        ]
    );
}

#[tokio::test]
async fn batch_override_skips_detection() {
    let temp = TempDir::new().expect("temp dir");
    let fetcher = FakeFetcher::new(Behavior::Fail);
    let mut session = session(settings(temp.path()), fetcher.clone(), FakePostFetcher::saving()).await;

    let urls = vec![
        "https://unknown-site.org/a".to_string(),
        "https://unknown-site.org/b".to_string(),
    ];
    let report = session
        .download_batch(&urls, Some(Platform::Reddit), None)
        .await;

    assert_eq!(report.attempted(), 2);
    assert_eq!(report.succeeded(), 0);
    assert_eq!(fetcher.urls(), urls);
    assert!(temp.path().join("Reddit").is_dir());
    assert!(session.history().records().iter().all(|r| r.platform == Platform::Reddit));
}

#[tokio::test]
async fn quality_applies_to_later_downloads() {
    let temp = TempDir::new().expect("temp dir");
    let fetcher = FakeFetcher::new(Behavior::Succeed);
    let mut session = session(settings(temp.path()), fetcher.clone(), FakePostFetcher::saving()).await;
    assert_eq!(session.quality(), Quality::Best);

    session.set_quality(Quality::Worst);
    session.download_one("https://vimeo.com/1", Platform::Other).await;
    session.download_one("https://vimeo.com/2", Platform::Other).await;

    assert_eq!(fetcher.formats(), ["worst", "worst"]);
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn invalid_single_url_is_recorded_without_fetching() {
    let temp = TempDir::new().expect("temp dir");
    let fetcher = FakeFetcher::new(Behavior::Succeed);
    let mut session = session(settings(temp.path()), fetcher.clone(), FakePostFetcher::saving()).await;

    let outcome = session.download_one("youtube.com/watch?v=a", Platform::YouTube).await;
    assert_eq!(outcome.failure_info().unwrap().kind, FailureKind::InvalidUrl);
    assert!(fetcher.urls().is_empty());
    assert!(!session.history().records()[0].success);
}

#[tokio::test]
async fn history_is_shared_across_sessions() {
    let temp = TempDir::new().expect("temp dir");
    {
        let mut first =
            session(settings(temp.path()), FakeFetcher::new(Behavior::Succeed), FakePostFetcher::saving()).await;
        first.download_one("https://youtu.be/abc", Platform::YouTube).await;
    }

    let second =
        session(settings(temp.path()), FakeFetcher::new(Behavior::Succeed), FakePostFetcher::saving()).await;
    let records = second.history().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].filename.as_deref(), Some("Sample Clip.mp4"));
}
