//! Unified error handling for loginstats.
//!
//! Database and configuration errors live beside their modules; this module
//! holds the errors raised by the collection pipeline and the metrics layer.

use crate::db::DbError;
use thiserror::Error;

// ============================================================================
// Collection Errors
// ============================================================================

/// Errors raised by a detection pass.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The account store could not be read.
    #[error("failed to fetch accounts: {0}")]
    Fetch(#[from] DbError),
}

impl StatsError {
    /// Get a static error code string for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Fetch(DbError::Timeout(_)) => "fetch_timeout",
            Self::Fetch(_) => "fetch_failed",
        }
    }
}

// ============================================================================
// Metrics Errors
// ============================================================================

/// Errors raised while creating or registering gauges.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to create metric {name}: {source}")]
    Create {
        name: &'static str,
        #[source]
        source: prometheus::Error,
    },

    /// Registration already failed once; the message is replayed to later callers.
    #[error("failed to register login metrics: {0}")]
    Registration(String),
}
