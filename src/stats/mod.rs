//! Login statistics: anomaly detection over the account table.
//!
//! - [`detector`]: pure duplicate / casing scan over fetched accounts
//! - [`collector`]: fetch-detect-export pass, the ad-hoc snapshot and the
//!   periodic collection loop

use crate::db::{Database, DbError};
use async_trait::async_trait;

pub mod collector;
pub mod detector;

pub use collector::LoginStatsCollector;
pub use detector::detect;

/// One row of the account table as seen by a detection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub login: String,
    pub email: String,
}

impl AccountRecord {
    pub fn new(login: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            email: email.into(),
        }
    }
}

/// Result of one detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoginStats {
    pub duplicate_user_entries: u64,
    pub mixed_cased_users: u64,
}

impl LoginStats {
    #[inline]
    pub fn has_duplicate_user_entries(&self) -> bool {
        self.duplicate_user_entries > 0
    }
}

/// Source of account rows for the collector.
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Fetch the login and email of every account.
    async fn fetch_accounts(&self) -> Result<Vec<AccountRecord>, DbError>;
}

#[async_trait]
impl AccountSource for Database {
    async fn fetch_accounts(&self) -> Result<Vec<AccountRecord>, DbError> {
        self.users().fetch_login_pairs().await
    }
}
