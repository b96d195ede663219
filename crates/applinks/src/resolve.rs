//! The app-resolution seam: who, if anyone, can handle a URI outside the
//! browser.

use std::{collections::HashMap, sync::Arc, time::Duration};

use {
    async_trait::async_trait,
    tokio::{sync::Mutex, time::Instant},
    tracing::debug,
};

use crate::{error::ResolveError, types::AppCandidate};

/// Oracle mapping a URI to the installed applications that claim it.
///
/// An empty vec is the normal "nothing installed" answer, not an error, and
/// implementations must not fail for unknown schemes. Candidate order is
/// oracle-defined and passed through unchanged; callers treat the first
/// candidate as canonical.
#[async_trait]
pub trait AppResolver: Send + Sync {
    async fn resolve(&self, uri: &str) -> Result<Vec<AppCandidate>, ResolveError>;
}

#[async_trait]
impl<R: AppResolver + ?Sized> AppResolver for Arc<R> {
    async fn resolve(&self, uri: &str) -> Result<Vec<AppCandidate>, ResolveError> {
        (**self).resolve(uri).await
    }
}

/// Fixed scheme → candidates table.
///
/// Stands in for the platform oracle in tests and in embedders that ship a
/// static handler registry.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    by_scheme: HashMap<String, Vec<AppCandidate>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate for a scheme. Repeat calls for one scheme append,
    /// so registration order is candidate order.
    #[must_use]
    pub fn register(mut self, scheme: &str, candidate: AppCandidate) -> Self {
        self.by_scheme
            .entry(scheme.to_ascii_lowercase())
            .or_default()
            .push(candidate);
        self
    }
}

#[async_trait]
impl AppResolver for StaticResolver {
    async fn resolve(&self, uri: &str) -> Result<Vec<AppCandidate>, ResolveError> {
        let scheme = uri
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .unwrap_or(uri)
            .to_ascii_lowercase();
        Ok(self.by_scheme.get(&scheme).cloned().unwrap_or_default())
    }
}

/// TTL cache over an inner resolver.
///
/// A redirect chain evaluates the same target several times in quick
/// succession; one oracle answer is reused until its entry expires. Errors
/// are never cached: a failed lookup is retried on the next request.
pub struct CachedResolver<R> {
    inner: R,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    candidates: Vec<AppCandidate>,
    resolved_at: Instant,
}

impl<R: AppResolver> CachedResolver<R> {
    pub fn new(inner: R, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<R: AppResolver> AppResolver for CachedResolver<R> {
    async fn resolve(&self, uri: &str) -> Result<Vec<AppCandidate>, ResolveError> {
        if self.ttl.is_zero() {
            return self.inner.resolve(uri).await;
        }

        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(uri) {
                if entry.resolved_at.elapsed() < self.ttl {
                    debug!(uri, "resolver cache hit");
                    return Ok(entry.candidates.clone());
                }
            }
        }

        let candidates = self.inner.resolve(uri).await?;

        let mut entries = self.entries.lock().await;
        // Expired entries are dropped opportunistically on insert.
        entries.retain(|_, entry| entry.resolved_at.elapsed() < self.ttl);
        entries.insert(
            uri.to_string(),
            CacheEntry {
                candidates: candidates.clone(),
                resolved_at: Instant::now(),
            },
        );
        Ok(candidates)
    }
}
