//! Link-Crawler: a recursive, concurrent web crawler
//!
//! This crate resolves a seed document into a list of links, then visits every
//! reachable link exactly once with a bounded pool of workers and reports how
//! many requests succeeded and failed once no work remains.

pub mod config;
pub mod crawler;
pub mod output;
pub mod seed;
pub mod server;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed: {0}")]
    InvalidSeed(#[from] SeedError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while resolving the seed document into a link list
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Crawler endpoint is not set!")]
    EndpointNotSet,

    #[error("Invalid starting endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Could not crawl starting endpoint {endpoint}: {source}")]
    Unreachable {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("Starting endpoint {endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Starting endpoint {endpoint} returned an empty body")]
    EmptyBody { endpoint: String },

    #[error("Invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Seed document contains no links")]
    NoLinks,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlStats, FetchOutcome, Fetcher, HttpFetcher};
pub use crate::url::{canonicalize, normalize_url, CanonicalLink};
