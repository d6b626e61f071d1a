//! Bounded worker dispatch
//!
//! The dispatcher pulls links from the frontier and runs each fetch as its own
//! tokio task. A semaphore bounds how many fetches are in flight at once; the
//! frontier itself is unbounded, so discovery bursts never block workers.

use crate::crawler::completion::CompletionDetector;
use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::stats::StatsCollector;
use crate::url::CanonicalLink;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Drives one crawl run's frontier until it drains
pub struct Dispatcher<F: Fetcher> {
    fetcher: Arc<F>,
    frontier: Arc<Frontier>,
    stats: Arc<StatsCollector>,
    detector: Arc<CompletionDetector>,
    workers: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl<F: Fetcher> Dispatcher<F> {
    /// Creates a dispatcher allowing at most `max_workers` concurrent fetches
    pub fn new(
        fetcher: Arc<F>,
        frontier: Arc<Frontier>,
        stats: Arc<StatsCollector>,
        detector: Arc<CompletionDetector>,
        max_workers: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            frontier,
            stats,
            detector,
            workers: Arc::new(Semaphore::new(max_workers.max(1))),
            cancel,
        }
    }

    /// Runs until the frontier is drained (or cancellation has drained the
    /// in-flight fetches), then marks the run done
    ///
    /// # Loop
    ///
    /// 1. Stop submitting if cancellation was requested
    /// 2. Wait for a free worker slot
    /// 3. Dequeue a link; if there is one, spawn its fetch
    /// 4. Otherwise finish if nothing is in flight, or sleep until a fetch
    ///    completes or enqueues new links
    pub async fn run(self) {
        loop {
            if self.cancel.is_cancelled() {
                tracing::info!(
                    "Crawl cancelled with {} links pending, draining {} in-flight fetches",
                    self.frontier.len(),
                    self.detector.in_flight()
                );
                self.detector.begin_draining();
                break;
            }

            let permit = tokio::select! {
                permit = Arc::clone(&self.workers).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
                _ = self.cancel.cancelled() => continue,
            };

            match self.frontier.dequeue() {
                Some(link) => self.submit(link, permit),
                None => {
                    drop(permit);

                    if self.detector.is_drained(&self.frontier) {
                        break;
                    }

                    tokio::select! {
                        _ = self.detector.wait_for_activity() => {}
                        _ = self.cancel.cancelled() => {}
                    }
                }
            }
        }

        while self.detector.in_flight() > 0 {
            self.detector.wait_for_activity().await;
        }

        self.detector.mark_done();
    }

    /// Spawns the fetch of one link on a worker slot
    fn submit(&self, link: CanonicalLink, permit: OwnedSemaphorePermit) {
        let in_flight = self.detector.task_started();
        let fetcher = Arc::clone(&self.fetcher);
        let frontier = Arc::clone(&self.frontier);
        let stats = Arc::clone(&self.stats);
        let detector = Arc::clone(&self.detector);

        tokio::spawn(async move {
            // Both are released when the task ends, even by panic
            let _permit = permit;
            let _in_flight = in_flight;

            tracing::debug!("Crawling {}", link);
            let outcome = fetcher.fetch(&link).await;
            stats.record(&outcome);

            match &outcome {
                FetchOutcome::Success { status_code, links } => {
                    let added = frontier.try_claim_all(links);
                    tracing::debug!(
                        "Fetched {} (HTTP {}): {} links, {} new",
                        link,
                        status_code,
                        links.len(),
                        added
                    );
                    if added > 0 {
                        detector.work_enqueued();
                    }
                }
                FetchOutcome::Failure { reason } => {
                    tracing::warn!("Failed to crawl {}: {}", link, reason);
                }
            }
        });
    }
}
