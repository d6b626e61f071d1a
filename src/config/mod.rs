//! Configuration module for Link-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use link_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.max_pool_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, ServerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, hash_config, load_config, load_config_with_hash, parse_config,
};
pub use validation::validate;
