//! Login statistics collection configuration.

use serde::Deserialize;
use std::time::Duration;

use super::defaults::{default_collection_interval, default_fetch_timeout};

/// Collection cadence for the login statistics task.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// Seconds between detection passes (default: 1800).
    #[serde(default = "default_collection_interval")]
    pub collection_interval: u64,
    /// Seconds allowed for one account fetch before it counts as failed (default: 60).
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            collection_interval: default_collection_interval(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

impl StatsConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.collection_interval)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}
