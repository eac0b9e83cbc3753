//! Parsed page wrapper with optional-field lookups
//!
//! Extraction code asks for a field by selector and gets `Option` back, so a
//! missing element is an ordinary value rather than an error path.

use crate::crawler::fetcher::PageDocument;
use scraper::{ElementRef, Html, Selector};

/// An HTML document parsed from a [`PageDocument`]
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    pub fn parse(page: &PageDocument) -> Self {
        Self::from_markup(&page.text())
    }

    pub fn from_markup(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// All elements matching `selector`, in document order
    pub fn select_all<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> {
        self.html.select(selector)
    }

    /// Text content of the first element matching `selector`
    ///
    /// Returns `None` when nothing matches. An element with no text yields
    /// `Some("")`.
    pub fn first_text(&self, selector: &Selector) -> Option<String> {
        self.html
            .select(selector)
            .next()
            .map(|element| element.text().collect::<String>())
    }
}
