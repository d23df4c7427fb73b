//! Persistent result cache.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use lode_cache::{CacheError, Fingerprint, ResultCache};

use crate::error::StoreError;

/// [`ResultCache`] backed by the `result_cache` table.
///
/// Expiry is stored as unix milliseconds; expired rows are invisible to
/// [`ResultCache::get`] and removed by [`SqlResultCache::purge_expired`].
#[derive(Clone)]
pub struct SqlResultCache {
    conn: libsql::Connection,
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn backend(e: libsql::Error) -> CacheError {
    CacheError::Backend(e.to_string())
}

impl SqlResultCache {
    pub(crate) const fn new(conn: libsql::Connection) -> Self {
        Self { conn }
    }

    /// Delete every expired entry, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the delete fails.
    pub async fn purge_expired(&self) -> Result<u64, StoreError> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM result_cache WHERE expires_at <= ?1",
                libsql::params![now_millis()],
            )
            .await?;
        tracing::debug!(removed, "purged expired cache entries");
        Ok(removed)
    }

    /// Delete every entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the delete fails.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        Ok(self.conn.execute("DELETE FROM result_cache", ()).await?)
    }
}

#[async_trait]
impl ResultCache for SqlResultCache {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Vec<u8>>, CacheError> {
        let mut rows = self
            .conn
            .query(
                "SELECT payload FROM result_cache WHERE fingerprint = ?1 AND expires_at > ?2",
                libsql::params![fingerprint.as_str(), now_millis()],
            )
            .await
            .map_err(backend)?;
        match rows.next().await.map_err(backend)? {
            Some(row) => Ok(Some(row.get::<Vec<u8>>(0).map_err(backend)?)),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        fingerprint: &Fingerprint,
        payload: &[u8],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.conn
            .execute(
                "INSERT OR REPLACE INTO result_cache (fingerprint, payload, expires_at)
                 VALUES (?1, ?2, ?3)",
                libsql::params![
                    fingerprint.as_str(),
                    libsql::Value::Blob(payload.to_vec()),
                    now_millis().saturating_add(ttl_ms)
                ],
            )
            .await
            .map_err(backend)?;
        Ok(())
    }
}
