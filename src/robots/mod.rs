//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! It respects robots.txt directives when crawling the catalogue.

mod gate;
mod parser;

pub use gate::{LoadedPolicy, PermissionGate};
pub use parser::ParsedRobots;

use crate::CrawlError;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};

/// Fetches and parses robots.txt
///
/// # Status handling
///
/// | Response | Result |
/// |----------|--------|
/// | 2xx | Body parsed as robots.txt |
/// | 401, 403 | Deny-all policy |
/// | Other 4xx | Allow-all policy |
/// | 5xx, other | `Err(CrawlError::Status)` |
/// | Transport error | `Err(CrawlError::Http)` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `robots_url` - Absolute URL of the robots.txt document
/// * `user_agent` - The user agent string to present
pub async fn fetch_robots(
    client: &Client,
    robots_url: &str,
    user_agent: &str,
) -> Result<ParsedRobots, CrawlError> {
    let response = client
        .get(robots_url)
        .header(USER_AGENT, user_agent)
        .send()
        .await
        .map_err(|source| CrawlError::Http {
            url: robots_url.to_string(),
            source,
        })?;

    let status = response.status();
    if status.is_success() {
        let body = response.text().await.map_err(|source| CrawlError::Http {
            url: robots_url.to_string(),
            source,
        })?;
        tracing::debug!(robots_url, bytes = body.len(), "Parsed robots.txt");
        return Ok(ParsedRobots::from_content(&body));
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            tracing::warn!(robots_url, status = status.as_u16(), "robots.txt refused, denying all");
            Ok(ParsedRobots::deny_all())
        }
        s if s.is_client_error() => {
            tracing::debug!(robots_url, status = s.as_u16(), "No robots.txt, allowing all");
            Ok(ParsedRobots::allow_all())
        }
        s => Err(CrawlError::Status {
            url: robots_url.to_string(),
            status: s.as_u16(),
        }),
    }
}
