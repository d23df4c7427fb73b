//! # lode-store
//!
//! libSQL persistence for Lodestar.
//!
//! One local database holds two tables: the append-only `audit_log`
//! ([`SqlAuditLog`]) and the persistent `result_cache` ([`SqlResultCache`]).
//! Migrations are embedded and run on every open.

pub mod audit;
pub mod cache;
pub mod error;
pub mod helpers;
mod migrations;

pub use audit::{AuditSink, SqlAuditLog};
pub use cache::SqlResultCache;
pub use error::StoreError;

use lode_config::StoreConfig;
use libsql::Builder;

/// Handle to the local database.
pub struct LodeStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LodeStore {
    /// Open the database named by configuration, creating its parent
    /// directory when needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory, database or migrations fail.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        if let Some(dir) = config.parent_dir() {
            std::fs::create_dir_all(dir)?;
        }
        Self::open_local(&config.path).await
    }

    /// Open a local database at `path` (`:memory:` for in-process).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        let store = Self { db, conn };
        store.run_migrations().await?;
        tracing::debug!(path, "opened store");
        Ok(store)
    }

    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub fn audit_log(&self) -> SqlAuditLog {
        SqlAuditLog::new(self.conn.clone())
    }

    #[must_use]
    pub fn result_cache(&self) -> SqlResultCache {
        SqlResultCache::new(self.conn.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_both_tables() {
        let store = LodeStore::open_local(":memory:").await.unwrap();
        for table in ["audit_log", "result_cache"] {
            let mut rows = store
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            assert!(rows.next().await.unwrap().is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let store = LodeStore::open_local(":memory:").await.unwrap();
        store.run_migrations().await.unwrap();
    }
}
