//! Detail page parser
//!
//! Extracts a [`BookRecord`] from a product page. A page missing any of the
//! title, price or availability elements produces no record; the crawl
//! carries on with the next page.

use crate::crawler::document::ParsedDocument;
use crate::crawler::fetcher::PageDocument;
use crate::crawler::normalize::{normalize_price, normalize_stock};
use crate::output::BookRecord;
use scraper::Selector;
use thiserror::Error;

const TITLE_SELECTOR: &str = ".product_main h1";
const PRICE_SELECTOR: &str = ".price_color";
const AVAILABILITY_SELECTOR: &str = ".instock.availability";

/// Why a detail page produced no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailParseError {
    #[error("document is empty")]
    EmptyDocument,

    #[error("missing {0} element")]
    MissingField(&'static str),
}

/// Parses a detail page, logging and discarding failures
///
/// The record's URL is the page's own URL, not anything found in the markup.
pub fn parse_detail(page: &PageDocument) -> Option<BookRecord> {
    match extract_detail(page) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(url = %page.url, error = %e, "Could not parse book detail");
            None
        }
    }
}

/// Parses a detail page, reporting which field was missing
pub fn extract_detail(page: &PageDocument) -> Result<BookRecord, DetailParseError> {
    if page.is_empty() {
        return Err(DetailParseError::EmptyDocument);
    }

    let document = ParsedDocument::parse(page);

    let title = lookup(&document, TITLE_SELECTOR, "title")?;
    let raw_price = lookup(&document, PRICE_SELECTOR, "price")?;
    let raw_stock = lookup(&document, AVAILABILITY_SELECTOR, "availability")?;

    Ok(BookRecord {
        title: title.trim().to_string(),
        price: normalize_price(raw_price.trim()),
        stock_qty: normalize_stock(raw_stock.trim()),
        url: page.url.clone(),
    })
}

fn lookup(
    document: &ParsedDocument,
    css: &'static str,
    field: &'static str,
) -> Result<String, DetailParseError> {
    let selector = Selector::parse(css).map_err(|_| DetailParseError::MissingField(field))?;
    document
        .first_text(&selector)
        .ok_or(DetailParseError::MissingField(field))
}
