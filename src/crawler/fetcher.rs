//! HTTP fetcher implementation
//!
//! This module performs the single GET behind every crawl step:
//! - Building the HTTP client with the crawler's user agent
//! - Classifying the response (`< 400` succeeds, everything else fails)
//! - Extracting outbound links from successful HTML responses
//!
//! Fetchers never count or enqueue anything; that is the dispatcher's job.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::extract_links;
use crate::url::CanonicalLink;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Statuses below this are successes
const FAILURE_STATUS_THRESHOLD: u16 = 400;

/// Upper bound for the TCP connect phase, capped by the request timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Result of one fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server answered with a status below 400
    Success {
        /// HTTP status code
        status_code: u16,
        /// Absolute link targets found in the body, in document order
        links: Vec<String>,
    },

    /// The fetch failed; no links are reported
    Failure {
        /// Why the fetch failed
        reason: FailureReason,
    },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Links discovered by this fetch (empty on failure)
    pub fn links(&self) -> &[String] {
        match self {
            Self::Success { links, .. } => links,
            Self::Failure { .. } => &[],
        }
    }
}

/// Why a fetch was counted as a failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    Network(String),

    #[error("Invalid link: {0}")]
    MalformedUrl(String),
}

/// Performs one fetch of a link
///
/// Implementations must not retry and must report every failure through
/// [`FetchOutcome::Failure`] instead of panicking.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, link: &CanonicalLink) -> impl Future<Output = FetchOutcome> + Send;
}

/// Returns true if a status code counts as a successful request
///
/// Redirect statuses count as successes; whether they are followed is up to
/// the client's redirect policy.
pub fn is_successful_status(status_code: u16) -> bool {
    status_code < FAILURE_STATUS_THRESHOLD
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Timeouts and redirect policy
///
/// # Example
///
/// ```no_run
/// use link_crawler::config::{CrawlerConfig, UserAgentConfig};
/// use link_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", user_agent.crawler_name, user_agent.crawler_version);

    let redirect = if crawler.max_redirects == 0 {
        Policy::none()
    } else {
        Policy::limited(crawler.max_redirects as usize)
    };

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(
            CONNECT_TIMEOUT_SECS.min(crawler.request_timeout),
        ))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a client configured from the crawler settings
    pub fn from_config(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, crawler)?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, link: &CanonicalLink) -> FetchOutcome {
        fetch_url(&self.client, link).await
    }
}

/// Fetches a link and classifies the response
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Status < 400 | Success, links extracted from HTML bodies |
/// | Status >= 400 | Failure (HttpStatus) |
/// | Timeout, refused connection, broken body | Failure (Network) |
/// | Unparsable or non-HTTP link | Failure (MalformedUrl) |
pub async fn fetch_url(client: &Client, link: &CanonicalLink) -> FetchOutcome {
    let url = match link.to_url() {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => url,
        Ok(url) => return failure(FailureReason::MalformedUrl(url.to_string())),
        Err(e) => return failure(FailureReason::MalformedUrl(format!("{}: {}", link, e))),
    };

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return failure(classify_request_error(&e)),
    };

    let status_code = response.status().as_u16();
    if !is_successful_status(status_code) {
        return failure(FailureReason::HttpStatus(status_code));
    }

    // Links resolve against where we ended up after redirects
    let final_url = response.url().clone();

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(true, |ct| ct.to_ascii_lowercase().contains("html"));

    if !is_html {
        return FetchOutcome::Success {
            status_code,
            links: Vec::new(),
        };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success {
            status_code,
            links: extract_links(&body, &final_url),
        },
        Err(e) => failure(classify_request_error(&e)),
    }
}

fn failure(reason: FailureReason) -> FetchOutcome {
    FetchOutcome::Failure { reason }
}

fn classify_request_error(e: &reqwest::Error) -> FailureReason {
    if e.is_builder() {
        FailureReason::MalformedUrl(e.to_string())
    } else if e.is_timeout() {
        FailureReason::Network("Request timeout".to_string())
    } else if e.is_connect() {
        FailureReason::Network("Connection refused".to_string())
    } else {
        FailureReason::Network(e.to_string())
    }
}
