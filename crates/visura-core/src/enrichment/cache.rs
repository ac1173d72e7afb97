//! Bounded memoization in front of an enricher.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use tracing::trace;

use super::{AtecoDetails, AtecoEnricher};

/// LRU cache over another [`AtecoEnricher`].
///
/// Misses are cached too, so an unknown code is looked up once.
pub struct CachedEnricher {
    inner: Arc<dyn AtecoEnricher>,
    cache: Mutex<LruCache<String, Option<AtecoDetails>>>,
}

impl CachedEnricher {
    /// Wrap `inner`, keeping at most `capacity` entries (minimum 1).
    pub fn new(inner: Arc<dyn AtecoEnricher>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AtecoEnricher for CachedEnricher {
    fn enrich(&self, code: &str) -> Option<AtecoDetails> {
        {
            let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = cache.get(code) {
                trace!("Enrichment cache hit for {}", code);
                return hit.clone();
            }
        }

        // Lookup runs unlocked; concurrent misses on one code may both compute.
        let details = self.inner.enrich(code);
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .put(code.to_string(), details.clone());
        details
    }
}
