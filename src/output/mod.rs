//! Output module for crawl results
//!
//! This module handles:
//! - The record type produced by the detail parser
//! - Writing the record set to CSV
//! - Recording crawl statistics and printing the end-of-run summary

mod csv_output;
mod stats;
mod traits;

pub use csv_output::{ensure_parent_dir, CsvSink};
pub use stats::{render_summary, ConsoleSummary, CrawlStats};
pub use traits::{BookRecord, RecordSink, SummaryReporter};
