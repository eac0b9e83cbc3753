//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured header template
//! - Consulting the permission gate before every request
//! - Randomized pacing before each request
//! - User agent rotation
//! - Fixed-count retry on transport failures and non-2xx responses

use crate::config::{Config, FetchConfig};
use crate::crawler::identity::UserAgentPool;
use crate::crawler::retry::retry_fixed;
use crate::robots::PermissionGate;
use crate::CrawlError;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Raw markup of a fetched page together with the URL it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDocument {
    pub url: String,
    pub body: Vec<u8>,
}

impl PageDocument {
    pub fn new(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// The body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client carries the request timeout, the `Accept-Language` header and
/// the fallback user agent. The rotating user agent is attached per request.
///
/// # Example
///
/// ```no_run
/// use shelfscan::config::Config;
/// use shelfscan::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, CrawlError> {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&config.headers.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    } else {
        tracing::warn!(
            accept_language = %config.headers.accept_language,
            "Ignoring invalid Accept-Language value"
        );
    }

    let client = Client::builder()
        .user_agent(config.headers.fallback_user_agent.clone())
        .default_headers(headers)
        .timeout(config.fetch.timeout())
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Polite single-URL fetcher
///
/// Owns the HTTP client, the permission gate and the client identity, so all
/// mutable session state lives here rather than in globals.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    gate: PermissionGate,
    identity: UserAgentPool,
    settings: FetchConfig,
}

impl Fetcher {
    /// Creates a fetcher for the configured site
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, config: &Config) -> Self {
        let gate = PermissionGate::new(client.clone(), config.site.robots_url());
        Self {
            client,
            gate,
            identity: UserAgentPool::from_config(&config.headers),
            settings: config.fetch.clone(),
        }
    }

    /// The user agent currently presented
    pub fn user_agent(&self) -> &str {
        self.identity.current()
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    /// Fetches `url` and returns its body, or `None` if it could not be fetched
    ///
    /// # Request Flow
    ///
    /// 1. Ask the permission gate; a denial returns `None` at once
    /// 2. Sleep a random pacing delay from the configured range
    /// 3. Rotate the user agent
    /// 4. GET with up to `max_retries` attempts, sleeping the fixed back-off
    ///    between failures
    pub async fn fetch(&mut self, url: &str) -> Option<PageDocument> {
        let current_agent = self.identity.current().to_string();
        if !self.gate.is_allowed(url, &current_agent).await {
            tracing::warn!(url, "Fetching disallowed by robots.txt");
            return None;
        }

        let delay = self.pacing_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let user_agent = self.identity.rotate().to_string();
        let client = &self.client;
        let result = retry_fixed(
            url,
            self.settings.max_retries,
            self.settings.retry_backoff(),
            || get_body(client, url, &user_agent),
        )
        .await;

        match result {
            Ok(body) => {
                tracing::debug!(url, bytes = body.len(), "Fetched page");
                Some(PageDocument::new(url, body))
            }
            Err(e) => {
                tracing::warn!(
                    url,
                    attempts = self.settings.max_retries,
                    error = %e,
                    "Giving up on URL"
                );
                None
            }
        }
    }

    /// Uniform random delay in `[min_delay_ms, max_delay_ms]`
    fn pacing_delay(&self) -> Duration {
        let (min, max) = (self.settings.min_delay_ms, self.settings.max_delay_ms);
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

/// Issues a single GET and returns the body of a 2xx response
async fn get_body(client: &Client, url: &str, user_agent: &str) -> Result<Vec<u8>, CrawlError> {
    let response = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .send()
        .await
        .map_err(|source| CrawlError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|source| CrawlError::Http {
        url: url.to_string(),
        source,
    })?;
    Ok(bytes.to_vec())
}
