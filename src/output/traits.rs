//! Output handler traits and types
//!
//! This module defines the record type produced by the crawl and the trait
//! interfaces for the sinks that receive it.

use crate::output::stats::CrawlStats;
use serde::Serialize;

/// One product extracted from a detail page
///
/// Field order matches the CSV header `title,price,stock_qty,url`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecord {
    /// Trimmed product title
    pub title: String,

    /// Price with currency symbols stripped; `0.0` when unparsable
    pub price: f64,

    /// Units in stock; `0` when the page gives no count
    pub stock_qty: u64,

    /// The detail page the record was extracted from
    pub url: String,
}

/// Trait for record sinks
///
/// A sink receives the complete, finalized record set exactly once, at the
/// end of a run that extracted at least one record.
pub trait RecordSink {
    /// Writes all records
    ///
    /// # Arguments
    ///
    /// * `records` - The records in crawl order
    fn write_records(&mut self, records: &[BookRecord]) -> crate::Result<()>;
}

/// Trait for end-of-run summary reporters
pub trait SummaryReporter {
    /// Reports on a finished run
    ///
    /// # Arguments
    ///
    /// * `records` - The records in crawl order
    /// * `stats` - Counters collected during the run
    fn report(&mut self, records: &[BookRecord], stats: &CrawlStats);
}
