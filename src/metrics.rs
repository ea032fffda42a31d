//! Prometheus metrics for loginstats.
//!
//! The [`Metrics`] handle owns the registry that the HTTP exporter scrapes.
//! It is built once in `main` and shared by reference; the login gauges are
//! created and registered lazily, exactly once, by the first caller of
//! [`Metrics::login_gauges`].
//!
//! ## Login Metrics
//!
//! - `grafana_stat_users_total_duplicate_user_entries` - duplicate entries by login or email
//! - `grafana_stat_users_has_duplicate_user_entries` - 1 when any duplicate exists
//! - `grafana_stat_users_total_mixed_cased_users` - users counted by the mixed-case rule

use crate::error::MetricsError;
use crate::stats::LoginStats;
use prometheus::{Encoder, IntGauge, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Namespace prepended to every exported metric name.
pub const EXPORTER_NAME: &str = "grafana";

/// The three gauges fed by each detection pass.
#[derive(Clone)]
pub struct LoginGauges {
    duplicate_user_entries: IntGauge,
    has_duplicate_user_entries: IntGauge,
    mixed_cased_users: IntGauge,
}

impl LoginGauges {
    fn new() -> Result<Self, MetricsError> {
        Ok(Self {
            duplicate_user_entries: gauge(
                "stat_users_total_duplicate_user_entries",
                "total number of duplicate user entries by email or login",
            )?,
            has_duplicate_user_entries: gauge(
                "stat_users_has_duplicate_user_entries",
                "instance has duplicate user entries by email or login",
            )?,
            mixed_cased_users: gauge(
                "stat_users_total_mixed_cased_users",
                "total number of users with upper and lower case logins or emails",
            )?,
        })
    }

    /// Overwrite all three gauges with the result of one pass.
    pub fn set(&self, stats: &LoginStats) {
        self.duplicate_user_entries
            .set(to_gauge(stats.duplicate_user_entries));
        self.has_duplicate_user_entries
            .set(i64::from(stats.has_duplicate_user_entries()));
        self.mixed_cased_users.set(to_gauge(stats.mixed_cased_users));
    }

    /// Register all three gauges or none of them.
    fn register(&self, registry: &Registry) -> Result<(), prometheus::Error> {
        let all = [
            &self.duplicate_user_entries,
            &self.has_duplicate_user_entries,
            &self.mixed_cased_users,
        ];
        for (i, g) in all.iter().enumerate() {
            if let Err(e) = registry.register(Box::new((*g).clone())) {
                tracing::warn!(error = %e, "Failed to register login metric");
                for registered in &all[..i] {
                    if let Err(e) = registry.unregister(Box::new((*registered).clone())) {
                        tracing::warn!(error = %e, "Failed to roll back login metric");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

fn gauge(name: &'static str, help: &str) -> Result<IntGauge, MetricsError> {
    IntGauge::with_opts(Opts::new(name, help).namespace(EXPORTER_NAME))
        .map_err(|source| MetricsError::Create { name, source })
}

fn to_gauge(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Process-wide metrics handle.
pub struct Metrics {
    registry: Registry,
    login: OnceLock<Result<LoginGauges, String>>,
}

impl Metrics {
    /// Create a handle backed by a fresh registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::new())
    }

    /// Create a handle backed by an existing registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            login: OnceLock::new(),
        }
    }

    /// Create and register the login gauges on first call, return them on every call.
    ///
    /// Concurrent first callers block until the single initialisation finishes.
    /// A failed registration is not retried; later callers get the same error.
    pub fn login_gauges(&self) -> Result<&LoginGauges, MetricsError> {
        let result = self.login.get_or_init(|| {
            let gauges = LoginGauges::new().map_err(|e| e.to_string())?;
            gauges
                .register(&self.registry)
                .map_err(|e| e.to_string())?;
            tracing::info!(namespace = EXPORTER_NAME, "Login metrics registered");
            Ok(gauges)
        });

        result
            .as_ref()
            .map_err(|msg| MetricsError::Registration(msg.clone()))
    }

    /// Gather all metrics and encode them in Prometheus text format.
    pub fn gather(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!(error = %e, "Failed to encode Prometheus metrics");
            return String::new();
        }
        match String::from_utf8(buffer) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
                String::new()
            }
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
