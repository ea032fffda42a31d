//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "loginstats".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}

// =============================================================================
// Database Defaults
// =============================================================================

pub fn default_database_path() -> String {
    "loginstats.db".to_string()
}

// =============================================================================
// Stats Defaults
// =============================================================================

/// Thirty minutes.
pub fn default_collection_interval() -> u64 {
    30 * 60
}

pub fn default_fetch_timeout() -> u64 {
    60
}
