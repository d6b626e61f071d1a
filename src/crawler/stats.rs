//! Request counters for one crawl run

use crate::crawler::fetcher::FetchOutcome;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a run's counters
///
/// Once the run has finished, `requests == successes + failures`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Total number of fetches performed
    pub requests: u64,

    /// Fetches answered with a status below 400
    pub successes: u64,

    /// Fetches answered with a status of 400 or above, or that never got a response
    pub failures: u64,
}

impl CrawlStats {
    /// Percentage of requests that succeeded (0.0 when nothing was fetched)
    pub fn success_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            (self.successes as f64 / self.requests as f64) * 100.0
        }
    }
}

/// Lock-free collector updated once per completed fetch
#[derive(Debug, Default)]
pub struct StatsCollector {
    requests: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one fetch
    pub fn record(&self, outcome: &FetchOutcome) {
        if outcome.is_success() {
            self.successes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Reads all three counters
    ///
    /// Only consistent once the run is done; while fetches are completing the
    /// counters may be observed mid-update.
    pub fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            requests: self.requests(),
            successes: self.successes(),
            failures: self.failures(),
        }
    }
}
