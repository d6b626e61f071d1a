//! Crawler module: the concurrent traversal engine
//!
//! This module contains the core crawling logic, including:
//! - The frontier (pending queue plus seen set)
//! - HTTP fetching and outcome classification
//! - HTML link extraction
//! - Bounded dispatch and completion detection
//! - Overall crawl orchestration

mod completion;
mod dispatcher;
mod engine;
mod fetcher;
mod frontier;
mod parser;
mod stats;

pub use completion::{CompletionDetector, CrawlPhase, InFlightGuard};
pub use dispatcher::Dispatcher;
pub use engine::{CrawlEngine, CrawlJob};
pub use fetcher::{
    build_http_client, fetch_url, is_successful_status, FailureReason, FetchOutcome, Fetcher,
    HttpFetcher,
};
pub use frontier::Frontier;
pub use parser::extract_links;
pub use stats::{CrawlStats, StatsCollector};

use crate::output::CrawlReport;
use crate::seed::resolve_seed_links;
use crate::CrawlError;
use chrono::Utc;

/// Runs a complete crawl from a seed endpoint
///
/// This is the shared entry point of the command line and the REST control
/// surface. It will:
/// 1. Fetch the seed document from `endpoint`
/// 2. Run the engine over its links
/// 3. Wrap the final stats with timing information
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run drained
/// * `Err(CrawlError::InvalidSeed)` - The seed endpoint or document was unusable
pub async fn crawl_endpoint(
    engine: &CrawlEngine<HttpFetcher>,
    endpoint: Option<&str>,
) -> Result<CrawlReport, CrawlError> {
    let started_at = Utc::now();

    let seeds = resolve_seed_links(engine.fetcher().client(), endpoint).await?;
    let stats = engine.run(seeds).await?;

    Ok(CrawlReport::new(started_at, Utc::now(), stats))
}
