//! Crawl statistics and the console summary
//!
//! This module provides the counters collected during a run and the
//! end-of-run table printed to stdout.

use crate::output::traits::{BookRecord, SummaryReporter};
use chrono::{DateTime, Utc};

/// Number of records shown in the summary table
const PREVIEW_ROWS: usize = 5;

/// Titles longer than this are truncated in the summary table
const TITLE_WIDTH: usize = 30;

/// Counters for a single crawl run
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished, once it has
    pub finished_at: Option<DateTime<Utc>>,

    /// Catalogue pages requested
    pub catalogue_pages: u64,

    /// Catalogue pages that yielded no detail URLs
    pub empty_catalogue_pages: u64,

    /// Detail URLs discovered across all catalogue pages
    pub detail_urls: u64,

    /// Detail pages that could not be fetched (denied or retries exhausted)
    pub fetch_failures: u64,

    /// Detail pages fetched but missing a required field
    pub parse_failures: u64,

    /// Records extracted
    pub records: u64,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            catalogue_pages: 0,
            empty_catalogue_pages: 0,
            detail_urls: 0,
            fetch_failures: 0,
            parse_failures: 0,
            records: 0,
        }
    }
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the run as finished now
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Share of discovered detail URLs that became records, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.detail_urls == 0 {
            return 0.0;
        }
        (self.records as f64 / self.detail_urls as f64) * 100.0
    }
}

/// Prints the summary table to stdout
#[derive(Debug, Default)]
pub struct ConsoleSummary;

impl SummaryReporter for ConsoleSummary {
    fn report(&mut self, records: &[BookRecord], stats: &CrawlStats) {
        print!("{}", render_summary(records, stats));
    }
}

/// Renders the first few records and the run totals as text
pub fn render_summary(records: &[BookRecord], stats: &CrawlStats) -> String {
    let mut out = String::from("\n=== Extraction Summary ===\n\n");

    out.push_str(&format!(
        "{:<width$}  {:>10}  {:>10}\n",
        "Title",
        "Price",
        "Stock",
        width = TITLE_WIDTH + 3
    ));
    for record in records.iter().take(PREVIEW_ROWS) {
        out.push_str(&format!(
            "{:<width$}  {:>10.2}  {:>10}\n",
            truncate_title(&record.title),
            record.price,
            record.stock_qty,
            width = TITLE_WIDTH + 3
        ));
    }

    out.push('\n');
    out.push_str(&format!(
        "Catalogue pages: {} ({} empty)\n",
        stats.catalogue_pages, stats.empty_catalogue_pages
    ));
    out.push_str(&format!(
        "Detail pages: {} found, {} not fetched, {} unparsable\n",
        stats.detail_urls, stats.fetch_failures, stats.parse_failures
    ));
    if let Some(seconds) = stats.duration_seconds() {
        out.push_str(&format!("Duration: {}s\n", seconds));
    }
    out.push_str(&format!(
        "Done. Total processed: {} ({:.1}% of detail pages)\n",
        records.len(),
        stats.success_rate()
    ));

    out
}

/// Shortens a title to the table width, marking the cut with `...`
fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_WIDTH {
        let head: String = title.chars().take(TITLE_WIDTH).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}
