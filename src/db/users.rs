//! User repository for the login statistics collector.
//!
//! Read-only: the collector measures the account table and never writes to it.

use super::DbError;
use crate::stats::AccountRecord;
use sqlx::SqlitePool;

/// Repository for user table reads.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch the login and email of every user, in insertion order.
    pub async fn fetch_login_pairs(&self) -> Result<Vec<AccountRecord>, DbError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT login, email
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(login, email)| AccountRecord::new(login, email))
            .collect())
    }
}
