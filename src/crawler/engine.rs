//! Crawl engine - one crawl run from seed links to final stats
//!
//! Each call to [`CrawlEngine::run`] builds a fresh [`CrawlJob`] (frontier,
//! counters, completion detector), so sequential or concurrent runs never see
//! each other's state.

use crate::crawler::completion::CompletionDetector;
use crate::crawler::dispatcher::Dispatcher;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::stats::{CrawlStats, StatsCollector};
use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::{CrawlError, SeedError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Per-run state, created by [`CrawlEngine::run`] and discarded afterwards
pub struct CrawlJob {
    seeds: Vec<String>,
    started_at: Instant,
    frontier: Arc<Frontier>,
    stats: Arc<StatsCollector>,
    detector: Arc<CompletionDetector>,
}

impl CrawlJob {
    fn new(seeds: Vec<String>) -> Self {
        Self {
            seeds,
            started_at: Instant::now(),
            frontier: Arc::new(Frontier::new()),
            stats: Arc::new(StatsCollector::new()),
            detector: Arc::new(CompletionDetector::new()),
        }
    }

    /// Claims the seeds, deduplicating them against each other
    ///
    /// Returns the number of distinct seeds queued.
    fn claim_seeds(&self) -> usize {
        self.frontier.try_claim_all(&self.seeds)
    }

    fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Orchestrates crawl runs over a shared fetcher
///
/// # Example
///
/// ```no_run
/// use link_crawler::crawler::CrawlEngine;
///
/// # async fn example() -> Result<(), link_crawler::CrawlError> {
/// let engine = CrawlEngine::with_defaults()?;
/// let stats = engine.run(vec!["https://example.com/".to_string()]).await?;
/// println!("{} requests, {} failed", stats.requests, stats.failures);
/// # Ok(())
/// # }
/// ```
pub struct CrawlEngine<F: Fetcher = HttpFetcher> {
    fetcher: Arc<F>,
    max_workers: usize,
}

impl CrawlEngine<HttpFetcher> {
    /// Builds an engine with an HTTP fetcher configured from the crawler settings
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::from_config(user_agent, crawler)?;
        Ok(Self::new(fetcher, crawler.max_pool_size as usize))
    }

    /// Builds an engine with the default configuration
    pub fn with_defaults() -> Result<Self, CrawlError> {
        Self::from_config(&CrawlerConfig::default(), &UserAgentConfig::default())
    }
}

impl<F: Fetcher> CrawlEngine<F> {
    /// Creates an engine that runs at most `max_workers` fetches at once
    pub fn new(fetcher: F, max_workers: usize) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Crawls everything reachable from `seeds` and returns the final counters
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - The run drained; per-link failures are counted, not raised
    /// * `Err(CrawlError::InvalidSeed)` - The seed list is empty; nothing was fetched
    pub async fn run(&self, seeds: Vec<String>) -> Result<CrawlStats, CrawlError> {
        self.run_with_cancel(seeds, CancellationToken::new()).await
    }

    /// Like [`run`](Self::run), but stops submitting new fetches once `cancel`
    /// fires
    ///
    /// Fetches already in flight still complete and are counted; the returned
    /// stats cover exactly the fetches that ran.
    pub async fn run_with_cancel(
        &self,
        seeds: Vec<String>,
        cancel: CancellationToken,
    ) -> Result<CrawlStats, CrawlError> {
        // Blank entries are claimed like any other link and fail as malformed
        if seeds.is_empty() {
            return Err(SeedError::NoLinks.into());
        }

        let job = CrawlJob::new(seeds);
        let queued = job.claim_seeds();
        tracing::info!(
            "Crawl started with {} seed links ({} distinct), {} workers",
            job.seeds.len(),
            queued,
            self.max_workers
        );

        let dispatcher = Dispatcher::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&job.frontier),
            Arc::clone(&job.stats),
            Arc::clone(&job.detector),
            self.max_workers,
            cancel,
        );
        let mut dispatch = tokio::spawn(dispatcher.run());

        tokio::select! {
            _ = job.detector.wait_until_done() => {}
            joined = &mut dispatch => {
                // The dispatcher only returns after marking the run done, so
                // reaching this arm first means it died.
                joined.map_err(|e| CrawlError::Internal(format!("dispatcher failed: {}", e)))?;
            }
        }
        if !dispatch.is_finished() {
            dispatch
                .await
                .map_err(|e| CrawlError::Internal(format!("dispatcher failed: {}", e)))?;
        }

        let stats = job.stats.snapshot();
        debug_assert_eq!(stats.requests, stats.successes + stats.failures);

        tracing::info!(
            "Finished crawling {} links in {:.2?}: {} requests, {} succeeded, {} failed",
            job.frontier.seen_count(),
            job.elapsed(),
            stats.requests,
            stats.successes,
            stats.failures
        );

        Ok(stats)
    }
}
