use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Shelfscan
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the built-in defaults, which target books.toscrape.com.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub fetch: FetchConfig,
    pub headers: HeaderConfig,
    pub output: OutputConfig,
}

/// Target site and page range
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Root URL of the catalogue, always ending in `/`
    pub base_url: String,

    /// First catalogue page to crawl (1-based)
    pub first_page: u32,

    /// Last catalogue page to crawl (inclusive)
    pub last_page: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://books.toscrape.com/".to_string(),
            first_page: 1,
            last_page: 2,
        }
    }
}

impl SiteConfig {
    /// URL of the robots.txt policy for this site
    pub fn robots_url(&self) -> String {
        format!("{}robots.txt", self.base_url)
    }

    /// URL of catalogue page `page`
    ///
    /// Page 1 is the bare base URL; later pages live under
    /// `catalogue/page-{n}.html`.
    pub fn catalogue_url(&self, page: u32) -> String {
        if page <= 1 {
            self.base_url.clone()
        } else {
            format!("{}catalogue/page-{}.html", self.base_url, page)
        }
    }

    /// Catalogue URLs for the whole configured page range, in crawl order
    pub fn catalogue_urls(&self) -> Vec<String> {
        (self.first_page..=self.last_page)
            .map(|page| self.catalogue_url(page))
            .collect()
    }
}

/// Fetch pacing, retry and timeout settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Attempts per URL before giving up
    pub max_retries: u32,

    /// Lower bound of the random pacing delay before each fetch (milliseconds)
    pub min_delay_ms: u64,

    /// Upper bound of the random pacing delay before each fetch (milliseconds)
    pub max_delay_ms: u64,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Fixed sleep between failed attempts (milliseconds)
    pub retry_backoff_ms: u64,

    /// Extra sleep after each successfully fetched detail page (milliseconds)
    pub detail_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            timeout_secs: 10,
            retry_backoff_ms: 2000,
            detail_delay_ms: 500,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }
}

/// Request header template
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HeaderConfig {
    /// Value of the `Accept-Language` header sent with every request
    pub accept_language: String,

    /// Identity used when the rotation pool yields nothing
    pub fallback_user_agent: String,

    /// Pool of user agents to rotate through
    pub user_agents: Vec<String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            accept_language: "en-US,en;q=0.9".to_string(),
            fallback_user_agent: "Mozilla/5.0 (compatible; ProScraper/1.0)".to_string(),
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0".to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0".to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0".to_string(),
            ],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the CSV file written at the end of the run
    pub csv_path: String,

    /// Path to the log file
    pub log_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "data/processed/books_data.csv".to_string(),
            log_path: "logs/scraper.log".to_string(),
        }
    }
}
