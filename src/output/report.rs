//! Crawl report generation

use crate::crawler::CrawlStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final report of one crawl run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    /// When the run started (seed resolution included)
    pub started_at: DateTime<Utc>,

    /// When the run drained
    pub finished_at: DateTime<Utc>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,

    /// Final request counters
    pub stats: CrawlStats,
}

impl CrawlReport {
    pub fn new(started_at: DateTime<Utc>, finished_at: DateTime<Utc>, stats: CrawlStats) -> Self {
        let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;
        Self {
            started_at,
            finished_at,
            duration_ms,
            stats,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_summary(report: &CrawlReport) {
    println!("=== Crawl Summary ===\n");

    println!("Started:  {}", report.started_at.to_rfc3339());
    println!("Finished: {}", report.finished_at.to_rfc3339());
    println!("Duration: {:.2}s", report.duration_secs());
    println!();

    println!("Total requests: {}", report.stats.requests);
    println!("Success count : {}", report.stats.successes);
    println!("Failed count  : {}", report.stats.failures);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} requests succeeded)",
        report.stats.success_rate(),
        report.stats.successes,
        report.stats.requests
    );
}

/// Renders the report as pretty-printed JSON
pub fn render_json(report: &CrawlReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
