//! Crawler module for catalogue fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with permission checks, pacing and retry
//! - User agent rotation
//! - Catalogue and detail page parsing
//! - Price and stock normalization
//! - Overall crawl coordination

mod catalogue;
mod coordinator;
mod detail;
mod document;
mod fetcher;
mod identity;
mod normalize;
mod retry;

pub use catalogue::{join_detail_url, parse_catalogue};
pub use coordinator::{finalize, run_crawl, Coordinator, CrawlOutcome};
pub use detail::{extract_detail, parse_detail, DetailParseError};
pub use document::ParsedDocument;
pub use fetcher::{build_http_client, Fetcher, PageDocument};
pub use identity::UserAgentPool;
pub use normalize::{normalize_price, normalize_stock};
pub use retry::retry_fixed;
