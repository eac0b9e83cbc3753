//! Catalogue page parser
//!
//! Turns a listing page into the ordered list of absolute detail-page URLs.

use crate::crawler::document::ParsedDocument;
use crate::crawler::fetcher::PageDocument;
use scraper::Selector;
use url::Url;

/// Extracts detail-page URLs from a catalogue page
///
/// Every `article.product_pod` entry contributes the `href` of its `h3 a`
/// anchor, joined onto `base_url` with [`join_detail_url`]. Entries without
/// an anchor are skipped. Document order is kept and duplicates are not
/// removed. An empty or unrecognised page yields an empty list.
///
/// # Example
///
/// ```
/// use shelfscan::crawler::{parse_catalogue, PageDocument};
///
/// let page = PageDocument::new(
///     "https://books.toscrape.com/",
///     r#"<article class="product_pod"><h3><a href="catalogue/a_1/index.html">A</a></h3></article>"#,
/// );
/// let urls = parse_catalogue(&page, "https://books.toscrape.com/");
/// assert_eq!(urls, vec!["https://books.toscrape.com/catalogue/a_1/index.html"]);
/// ```
pub fn parse_catalogue(page: &PageDocument, base_url: &str) -> Vec<String> {
    if page.is_empty() {
        return Vec::new();
    }

    let (Ok(entry_selector), Ok(link_selector)) =
        (Selector::parse("article.product_pod"), Selector::parse("h3 a"))
    else {
        return Vec::new();
    };

    let document = ParsedDocument::parse(page);
    let mut urls = Vec::new();

    for entry in document.select_all(&entry_selector) {
        let href = entry
            .select(&link_selector)
            .next()
            .and_then(|anchor| anchor.value().attr("href"));

        match href {
            Some(href) => urls.push(join_detail_url(base_url, href.trim())),
            None => tracing::debug!(page = %page.url, "Product entry without a link"),
        }
    }

    urls
}

/// Joins a product link from a catalogue page onto the site base URL
///
/// Absolute links are kept as they are. Relative links that already contain
/// `catalogue/` are relative to the site root; the rest are relative to the
/// `catalogue/` directory. Any run of slashes right after the host collapses
/// to one.
pub fn join_detail_url(base_url: &str, href: &str) -> String {
    let joined = if Url::parse(href).is_ok() {
        href.to_string()
    } else if href.contains("catalogue/") {
        format!("{}{}", base_url, href)
    } else {
        format!("{}catalogue/{}", base_url, href)
    };
    collapse_slashes_after_host(&joined)
}

/// Collapses repeated `/` at the start of the path, leaving the scheme's `//` alone
fn collapse_slashes_after_host(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let host_start = scheme_end + 3;

    match url[host_start..].find('/') {
        Some(offset) => {
            let path_start = host_start + offset;
            let rest = url[path_start..].trim_start_matches('/');
            format!("{}/{}", &url[..path_start], rest)
        }
        None => url.to_string(),
    }
}
