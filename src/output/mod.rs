//! Output module for crawl reports
//!
//! This module handles:
//! - Wrapping a run's final counters with timing information
//! - Printing a human-readable summary
//! - Rendering the report as JSON

mod report;

pub use report::{print_summary, render_json, CrawlReport};
