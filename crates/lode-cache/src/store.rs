//! The cache contract and its size-guarding wrapper.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;
use crate::fingerprint::Fingerprint;

/// Fingerprint-keyed storage for serialized results.
///
/// `set` is a single atomic write: an entry is either stored whole or not
/// at all. Expired entries must never be returned by `get`.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(
        &self,
        fingerprint: &Fingerprint,
        payload: &[u8],
        ttl: Duration,
    ) -> Result<(), CacheError>;
}

#[async_trait]
impl<T: ResultCache + ?Sized> ResultCache for Arc<T> {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).get(fingerprint).await
    }

    async fn set(
        &self,
        fingerprint: &Fingerprint,
        payload: &[u8],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        (**self).set(fingerprint, payload, ttl).await
    }
}

/// Wraps a backend and refuses payloads above `max_bytes` before they
/// reach it.
pub struct SizeGuardedCache<C> {
    inner: C,
    max_bytes: usize,
}

impl<C: ResultCache> SizeGuardedCache<C> {
    pub const fn new(inner: C, max_bytes: usize) -> Self {
        Self { inner, max_bytes }
    }

    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub const fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ResultCache> ResultCache for SizeGuardedCache<C> {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Vec<u8>>, CacheError> {
        self.inner.get(fingerprint).await
    }

    async fn set(
        &self,
        fingerprint: &Fingerprint,
        payload: &[u8],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        if payload.len() > self.max_bytes {
            tracing::debug!(
                fingerprint = fingerprint.short(),
                size = payload.len(),
                limit = self.max_bytes,
                "refusing oversized cache payload"
            );
            return Err(CacheError::PayloadTooLarge {
                size: payload.len(),
                limit: self.max_bytes,
            });
        }
        self.inner.set(fingerprint, payload, ttl).await
    }
}
