//! Raw registry records keyed by client key.

use dashmap::DashMap;
use std::sync::Arc;

use crate::observability::metrics;

/// A shared, in-memory cache of raw registry records.
///
/// Cloning yields another handle to the same map. Shard locks are released
/// before any method returns, so no lock outlives an `.await`.
#[derive(Debug, Clone, Default)]
pub struct RecordCache {
    inner: Arc<DashMap<String, Arc<str>>>,
}

impl RecordCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached record for a client key.
    pub fn get(&self, key: &str) -> Option<Arc<str>> {
        self.inner.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Insert or overwrite the record for a client key.
    pub fn put(&self, key: impl Into<String>, record: impl Into<Arc<str>>) {
        self.inner.insert(key.into(), record.into());
        metrics::record_cache_size(self.inner.len());
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let dropped = self.inner.len();
        self.inner.clear();
        metrics::record_cache_size(0);
        dropped
    }

    /// Clear the cache in response to an external invalidation trigger.
    pub fn invalidate(&self, trigger: &'static str) -> usize {
        let dropped = self.clear();
        metrics::record_cache_invalidation(trigger);
        tracing::info!(trigger, dropped, "Record cache invalidated");
        dropped
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
