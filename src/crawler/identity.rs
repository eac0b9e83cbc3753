//! Client identity rotation
//!
//! Every fetch presents a user agent drawn fresh from a configured pool.

use crate::config::HeaderConfig;
use rand::seq::IndexedRandom;

/// Rotating pool of user agent strings
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
    fallback: String,
    current: String,
}

impl UserAgentPool {
    /// Creates a pool; the initial identity is a random pick from `agents`
    pub fn new(agents: Vec<String>, fallback: impl Into<String>) -> Self {
        let fallback = fallback.into();
        let mut pool = Self {
            agents,
            current: fallback.clone(),
            fallback,
        };
        pool.rotate();
        pool
    }

    pub fn from_config(config: &HeaderConfig) -> Self {
        Self::new(
            config.user_agents.clone(),
            config.fallback_user_agent.clone(),
        )
    }

    /// The identity attached to the next outgoing request
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Replaces the current identity with a fresh pick from the pool
    ///
    /// Falls back to the fixed default identity when the pool is empty.
    pub fn rotate(&mut self) -> &str {
        self.current = match self.agents.choose(&mut rand::rng()) {
            Some(agent) => agent.clone(),
            None => self.fallback.clone(),
        };
        tracing::debug!(user_agent = %self.current, "Rotated user agent");
        &self.current
    }
}
