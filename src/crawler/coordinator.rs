//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that walks the catalogue pages in
//! order, fetches every detail page each one lists, and accumulates the
//! extracted records. The loop is strictly sequential: every fetch completes
//! before the next begins, so records come out in catalogue-then-listing
//! order.

use crate::config::{Config, SiteConfig};
use crate::crawler::catalogue::parse_catalogue;
use crate::crawler::detail::parse_detail;
use crate::crawler::fetcher::Fetcher;
use crate::output::{BookRecord, ConsoleSummary, CrawlStats, CsvSink, RecordSink, SummaryReporter};
use crate::CrawlError;
use std::time::Duration;

/// Finalized result of a crawl run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Records in crawl order
    pub records: Vec<BookRecord>,

    /// Counters for the run
    pub stats: CrawlStats,
}

impl CrawlOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    site: SiteConfig,
    detail_delay: Duration,
    fetcher: Fetcher,
    records: Vec<BookRecord>,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a new coordinator with its own HTTP client
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        let fetcher = Fetcher::new(config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(config: &Config, fetcher: Fetcher) -> Self {
        Self {
            site: config.site.clone(),
            detail_delay: config.fetch.detail_delay(),
            fetcher,
            records: Vec::new(),
            stats: CrawlStats::new(),
        }
    }

    /// Runs the crawl over the configured page range
    ///
    /// For each catalogue page in ascending order:
    /// 1. Fetch the page and extract its detail URLs
    /// 2. Skip to the next page if none resolve
    /// 3. Fetch and parse each detail page in listing order, keeping every
    ///    record that parses
    ///
    /// Nothing here is fatal: failed fetches and unparsable pages are counted
    /// and skipped.
    pub async fn run(mut self) -> CrawlOutcome {
        tracing::info!(
            base_url = %self.site.base_url,
            first_page = self.site.first_page,
            last_page = self.site.last_page,
            "Starting crawl"
        );

        for page_num in self.site.first_page..=self.site.last_page {
            let catalogue_url = self.site.catalogue_url(page_num);
            tracing::info!(page = page_num, url = %catalogue_url, "Processing catalogue page");
            self.stats.catalogue_pages += 1;

            let detail_urls = match self.fetcher.fetch(&catalogue_url).await {
                Some(page) => parse_catalogue(&page, &self.site.base_url),
                None => Vec::new(),
            };

            if detail_urls.is_empty() {
                tracing::warn!(page = page_num, "No books found on this page");
                self.stats.empty_catalogue_pages += 1;
                continue;
            }

            tracing::info!(
                page = page_num,
                count = detail_urls.len(),
                "Extracting book details"
            );
            self.stats.detail_urls += detail_urls.len() as u64;

            for detail_url in &detail_urls {
                self.process_detail(detail_url).await;
            }
        }

        self.stats.records = self.records.len() as u64;
        self.stats.finish();

        tracing::info!(
            records = self.stats.records,
            detail_urls = self.stats.detail_urls,
            fetch_failures = self.stats.fetch_failures,
            parse_failures = self.stats.parse_failures,
            duration_secs = self.stats.duration_seconds().unwrap_or(0),
            "Crawl completed"
        );

        CrawlOutcome {
            records: self.records,
            stats: self.stats,
        }
    }

    /// Fetches and parses one detail page
    async fn process_detail(&mut self, url: &str) {
        let Some(page) = self.fetcher.fetch(url).await else {
            self.stats.fetch_failures += 1;
            return;
        };

        match parse_detail(&page) {
            Some(record) => {
                tracing::debug!(url, title = %record.title, "Extracted book");
                self.records.push(record);
            }
            None => self.stats.parse_failures += 1,
        }

        if !self.detail_delay.is_zero() {
            tokio::time::sleep(self.detail_delay).await;
        }
    }
}

/// Hands a finished run to the output sink and the summary reporter
///
/// Both are skipped, and an error is logged, when the run extracted nothing.
///
/// # Returns
///
/// * `Ok(true)` - Records were written
/// * `Ok(false)` - Nothing to write
/// * `Err(CrawlError)` - The sink failed
pub fn finalize(
    outcome: &CrawlOutcome,
    sink: &mut dyn RecordSink,
    reporter: &mut dyn SummaryReporter,
) -> Result<bool, CrawlError> {
    if outcome.is_empty() {
        tracing::error!("No data was extracted");
        return Ok(false);
    }

    sink.write_records(&outcome.records)?;
    reporter.report(&outcome.records, &outcome.stats);
    Ok(true)
}

/// Runs the main crawl operation
///
/// This function orchestrates the entire crawl process:
///
/// 1. Prepare the CSV sink (creating its directory; failure aborts)
/// 2. Build the HTTP client, permission gate and fetcher
/// 3. Walk the catalogue pages and detail pages
/// 4. Write the CSV and print the summary if anything was extracted
///
/// # Example
///
/// ```no_run
/// use shelfscan::config::Config;
/// use shelfscan::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(&Config::default()).await?;
/// println!("{} books", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlOutcome, CrawlError> {
    let mut sink = CsvSink::create(&config.output.csv_path)?;
    let coordinator = Coordinator::new(config)?;

    let outcome = coordinator.run().await;
    finalize(&outcome, &mut sink, &mut ConsoleSummary)?;

    Ok(outcome)
}
