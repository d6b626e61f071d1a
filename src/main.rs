//! Link-Crawler main entry point
//!
//! This is the command-line interface for the Link-Crawler recursive web crawler.

use anyhow::Context;
use clap::Parser;
use link_crawler::config::{load_config_with_hash, Config};
use link_crawler::crawler::{crawl_endpoint, CrawlEngine};
use link_crawler::output::{print_summary, render_json};
use link_crawler::server::{start_server, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Link-Crawler: a recursive web crawler
///
/// Link-Crawler resolves a seed document into a list of links, visits every
/// link reachable from them exactly once, and reports how many requests
/// succeeded and failed.
#[derive(Parser, Debug)]
#[command(name = "link-crawler")]
#[command(version)]
#[command(about = "A recursive web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed endpoint to crawl, overriding `start-endpoint` from the config
    #[arg(short, long, value_name = "URL")]
    endpoint: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Serve the REST control surface instead of crawling once
    #[arg(long, conflicts_with = "dry_run")]
    serve: bool,

    /// Validate the configuration and show it without crawling
    #[arg(long)]
    dry_run: bool,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(&cli)?;
    if let Some(endpoint) = cli.endpoint.clone() {
        config.crawler.start_endpoint = Some(endpoint);
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    // One runtime worker thread per core pool slot; fetch concurrency is
    // bounded separately by max-pool-size.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.crawler.core_pool_size as usize)
        .thread_name("crawler-worker")
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    if cli.serve {
        runtime.block_on(handle_serve(config))
    } else {
        runtime.block_on(handle_crawl(config, cli.json))
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_crawler=info,warn"),
            1 => EnvFilter::new("link_crawler=debug,info"),
            2 => EnvFilter::new("link_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads and validates the configuration, or falls back to defaults
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let Some(path) = &cli.config else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Link-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Start endpoint: {}",
        config
            .crawler
            .start_endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or("(not set)")
    );
    println!("  Core pool size: {}", config.crawler.core_pool_size);
    println!("  Max pool size: {}", config.crawler.max_pool_size);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Max redirects: {}", config.crawler.max_redirects);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);

    println!("\nServer:");
    println!("  Bind address: {}", config.server.bind_address);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, json: bool) -> anyhow::Result<()> {
    let engine = CrawlEngine::from_config(&config.crawler, &config.user_agent)?;

    match crawl_endpoint(&engine, config.crawler.start_endpoint.as_deref()).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            if json {
                println!("{}", render_json(&report)?);
            } else {
                print_summary(&report);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the --serve mode: runs the REST control surface
async fn handle_serve(config: Config) -> anyhow::Result<()> {
    let engine = CrawlEngine::from_config(&config.crawler, &config.user_agent)?;
    let state = Arc::new(AppState::new(engine));

    start_server(&config.server.bind_address, state)
        .await
        .with_context(|| format!("Control surface on {} stopped", config.server.bind_address))
}
