//! Permission gate with a write-once policy cache
//!
//! The gate fetches the site's robots.txt on first use and keeps the parsed
//! policy for the rest of the process. A failed fetch is not cached: the
//! current check is allowed and the next check fetches again.

use crate::robots::{fetch_robots, ParsedRobots};
use chrono::{DateTime, Utc};
use reqwest::Client;

/// A successfully loaded policy and when it was loaded
#[derive(Debug, Clone)]
pub struct LoadedPolicy {
    /// The parsed robots.txt content
    pub robots: ParsedRobots,

    /// When the policy was fetched
    pub loaded_at: DateTime<Utc>,
}

impl LoadedPolicy {
    pub fn new(robots: ParsedRobots) -> Self {
        Self {
            robots,
            loaded_at: Utc::now(),
        }
    }
}

/// Answers allow/deny for a URL and user agent against the site policy
#[derive(Debug)]
pub struct PermissionGate {
    client: Client,
    robots_url: String,
    policy: Option<LoadedPolicy>,
}

impl PermissionGate {
    /// Creates a gate for the policy at `robots_url`; nothing is fetched yet
    pub fn new(client: Client, robots_url: impl Into<String>) -> Self {
        Self {
            client,
            robots_url: robots_url.into(),
            policy: None,
        }
    }

    /// The loaded policy, if a fetch has succeeded
    pub fn policy(&self) -> Option<&LoadedPolicy> {
        self.policy.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.policy.is_some()
    }

    /// Checks whether `user_agent` may fetch `url`
    ///
    /// Loads the policy first if it has not been loaded. If loading fails the
    /// URL is allowed and the policy stays unloaded, so the next call retries.
    pub async fn is_allowed(&mut self, url: &str, user_agent: &str) -> bool {
        if self.policy.is_none() {
            tracing::info!(robots_url = %self.robots_url, "Reading robots.txt");
            match fetch_robots(&self.client, &self.robots_url, user_agent).await {
                Ok(robots) => {
                    let policy = LoadedPolicy::new(robots);
                    tracing::debug!(
                        robots_url = %self.robots_url,
                        loaded_at = %policy.loaded_at,
                        "robots.txt policy loaded"
                    );
                    self.policy = Some(policy);
                }
                Err(e) => {
                    tracing::warn!(
                        robots_url = %self.robots_url,
                        error = %e,
                        "Could not read robots.txt, assuming permission"
                    );
                    return true;
                }
            }
        }

        self.policy
            .as_ref()
            .map_or(true, |policy| policy.robots.is_allowed(url, user_agent))
    }
}
