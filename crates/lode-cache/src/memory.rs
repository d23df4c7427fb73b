//! In-process cache with per-entry expiry.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::CacheError;
use crate::fingerprint::Fingerprint;
use crate::store::ResultCache;

/// Expiry used when `now + ttl` does not fit in an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

struct Entry {
    payload: Vec<u8>,
    expires_at: Instant,
}

/// A [`ResultCache`] backed by a `HashMap` behind a tokio mutex.
///
/// Expired entries are dropped lazily on read.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<Fingerprint, Entry>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until next read.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Vec<u8>>, CacheError> {
        let mut entries = self.entries.lock().await;
        match entries.get(fingerprint) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.payload.clone())),
            Some(_) => {
                entries.remove(fingerprint);
                tracing::debug!(fingerprint = fingerprint.short(), "evicted expired cache entry");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        fingerprint: &Fingerprint,
        payload: &[u8],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let entry = Entry {
            payload: payload.to_vec(),
            expires_at: now.checked_add(ttl).unwrap_or(now + FAR_FUTURE),
        };
        self.entries.lock().await.insert(fingerprint.clone(), entry);
        Ok(())
    }
}
