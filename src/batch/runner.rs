//! Sequential batch downloads with fixed pacing

use crate::batch::events::BatchEvent;
use crate::classifier::{detect_platform, validate, Platform};
use crate::extractor::{DownloadOutcome, FailureKind, FetchFailure, FetchGateway};
use crate::history::{DownloadRecord, HistoryStore};
use crate::utils::config::Quality;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Result for one batch entry
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub url: String,
    /// Platform used (or recorded) for the entry
    pub platform: Platform,
    /// False when the entry was rejected before reaching the gateway
    pub attempted: bool,
    pub outcome: DownloadOutcome,
}

/// Aggregate result of one batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_success()).count()
    }

    pub fn attempted(&self) -> usize {
        self.items.iter().filter(|i| i.attempted).count()
    }
}

/// Batch orchestrator
///
/// URLs are processed strictly one at a time in input order. After every
/// attempted fetch except the last entry the runner sleeps for
/// `request_delay`; entries rejected by validation or detection never wait.
#[derive(Clone)]
pub struct BatchRunner {
    gateway: Arc<FetchGateway>,
    request_delay: Duration,
}

impl BatchRunner {
    pub fn new(gateway: Arc<FetchGateway>, request_delay: Duration) -> Self {
        Self {
            gateway,
            request_delay,
        }
    }

    /// Run every URL once, recording each entry in `history`
    ///
    /// Events are sent on `events` when given; the sender is dropped when the
    /// batch ends so a receiver loop terminates on its own.
    pub async fn run(
        &self,
        urls: &[String],
        platform_override: Option<Platform>,
        quality: Quality,
        history: &mut HistoryStore,
        events: Option<mpsc::UnboundedSender<BatchEvent>>,
    ) -> BatchReport {
        let total = urls.len();
        let mut report = BatchReport {
            items: Vec::with_capacity(total),
        };
        let emit = |event: BatchEvent| {
            if let Some(tx) = &events {
                // receiver may have gone away; the batch carries on regardless
                let _ = tx.send(event);
            }
        };

        info!("Starting batch of {} URLs", total);
        for (i, url) in urls.iter().enumerate() {
            let index = i + 1;
            emit(BatchEvent::ItemStarted {
                index,
                total,
                url: url.clone(),
            });

            let item = match classify(url, platform_override) {
                Err((platform, failure)) => {
                    debug!("Skipping {}: {}", url, failure);
                    emit(BatchEvent::ItemSkipped {
                        index,
                        url: url.clone(),
                        failure: failure.clone(),
                    });
                    BatchItem {
                        url: url.clone(),
                        platform,
                        attempted: false,
                        outcome: DownloadOutcome::Failure(failure),
                    }
                }
                Ok(platform) => {
                    let outcome = self.gateway.download(url, platform, quality).await;
                    emit(BatchEvent::ItemFinished {
                        index,
                        url: url.clone(),
                        platform,
                        outcome: outcome.clone(),
                    });
                    BatchItem {
                        url: url.clone(),
                        platform,
                        attempted: true,
                        outcome,
                    }
                }
            };

            history
                .append(DownloadRecord::from_outcome(&item.url, item.platform, &item.outcome))
                .await;

            let pace = item.attempted && index < total;
            report.items.push(item);

            if pace {
                emit(BatchEvent::Waiting {
                    delay: self.request_delay,
                });
                tokio::time::sleep(self.request_delay).await;
            }
        }

        let succeeded = report.succeeded();
        info!("Batch download completed: {}/{} successful", succeeded, total);
        emit(BatchEvent::Finished { succeeded, total });
        report
    }
}

/// Effective platform, or the platform to record plus why the entry is skipped
fn classify(
    url: &str,
    platform_override: Option<Platform>,
) -> Result<Platform, (Platform, FetchFailure)> {
    let recorded = platform_override.unwrap_or(Platform::Other);

    if !validate(url) {
        return Err((
            recorded,
            FetchFailure::new(FailureKind::InvalidUrl, format!("Invalid URL: {}", url)),
        ));
    }

    platform_override.or_else(|| detect_platform(url)).ok_or_else(|| {
        (
            recorded,
            FetchFailure::new(
                FailureKind::UndetectedPlatform,
                format!("Could not detect platform for: {}", url),
            ),
        )
    })
}
