//! Login statistics collection.
//!
//! A pass fetches every account, runs [`detect`] and overwrites the login
//! gauges. Passes are driven two ways:
//! - [`LoginStatsCollector::run`]: background loop, one pass at start and one
//!   per interval until cancelled. Failures are logged and the next tick retries.
//! - [`LoginStatsCollector::collect_login_stats`]: on-demand snapshot for
//!   usage reports. Failures are returned to the caller.

use super::{AccountSource, LoginStats, detect};
use crate::db::DbError;
use crate::error::{MetricsError, StatsError};
use crate::metrics::{LoginGauges, Metrics};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const KEY_DUPLICATE_USER_ENTRIES: &str = "stats.users.duplicate_user_entries";
pub const KEY_HAS_DUPLICATE_USER_ENTRIES: &str = "stats.users.has_duplicate_user_entries";
pub const KEY_MIXED_CASED_USERS: &str = "stats.users.mixed_cased_users";

/// Why the collection loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown token was cancelled.
    Cancelled,
}

/// Fetches accounts, detects anomalies and exports the login gauges.
pub struct LoginStatsCollector {
    source: Arc<dyn AccountSource>,
    gauges: LoginGauges,
    interval: Duration,
    fetch_timeout: Duration,
}

impl LoginStatsCollector {
    /// Create a collector, registering the login gauges if nobody has yet.
    pub fn new(
        source: Arc<dyn AccountSource>,
        metrics: &Metrics,
        interval: Duration,
        fetch_timeout: Duration,
    ) -> Result<Self, MetricsError> {
        let gauges = metrics.login_gauges()?.clone();
        Ok(Self {
            source,
            gauges,
            interval,
            fetch_timeout,
        })
    }

    /// Run one detection pass and export its result to all three gauges.
    pub async fn get_login_stats(&self) -> Result<LoginStats, StatsError> {
        let accounts =
            match tokio::time::timeout(self.fetch_timeout, self.source.fetch_accounts()).await {
                Ok(result) => result?,
                Err(_) => return Err(DbError::Timeout(self.fetch_timeout).into()),
            };

        let stats = detect(&accounts);
        self.gauges.set(&stats);

        debug!(
            users = accounts.len(),
            duplicates = stats.duplicate_user_entries,
            mixed_cased = stats.mixed_cased_users,
            "Login stats collected"
        );
        Ok(stats)
    }

    /// Run one pass and return its values keyed for a usage stats report.
    pub async fn collect_login_stats(&self) -> Result<BTreeMap<&'static str, u64>, StatsError> {
        let stats = self.get_login_stats().await.map_err(|e| {
            error!(error = %e, code = e.error_code(), "Failed to get login stats");
            e
        })?;
        Ok(report(&stats))
    }

    /// Collect immediately, then once per interval, until `shutdown` is cancelled.
    ///
    /// An in-flight fetch is abandoned as soon as the token fires.
    pub async fn run(&self, shutdown: CancellationToken) -> StopReason {
        info!(
            interval_secs = self.interval.as_secs(),
            "Login stats collection started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                result = self.get_login_stats() => {
                    if let Err(e) = result {
                        warn!(error = %e, code = e.error_code(), "Failed to get login stats metrics");
                    }
                }
            }
        }

        info!("Login stats collection stopped");
        StopReason::Cancelled
    }
}

fn report(stats: &LoginStats) -> BTreeMap<&'static str, u64> {
    BTreeMap::from([
        (KEY_DUPLICATE_USER_ENTRIES, stats.duplicate_user_entries),
        (
            KEY_HAS_DUPLICATE_USER_ENTRIES,
            u64::from(stats.has_duplicate_user_entries()),
        ),
        (KEY_MIXED_CASED_USERS, stats.mixed_cased_users),
    ])
}
