//! Score cache for avoiding redundant similarity computations.
//!
//! Wraps any [`RelevanceScorer`] with a map keyed by
//! `(model_id, query hash, text hash)`, so repeated pruning runs over the
//! same corpus do not re-score identical pairs.

use async_trait::async_trait;
use ragprune_core::{CapabilityError, RelevanceScorer};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Maximum number of entries in the cache.
const DEFAULT_CACHE_SIZE: usize = 10_000;

/// A cached score entry.
#[derive(Clone, Copy)]
struct CacheEntry {
    score: f32,
    /// Access counter for LRU eviction
    access_count: u64,
}

/// Cache statistics.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries evicted
    pub evictions: u64,
}

/// Score cache with LRU eviction.
pub struct ScoreCache {
    /// The underlying scorer
    scorer: Arc<dyn RelevanceScorer>,
    /// Cache map: `(model, query hash, text hash)` key -> score
    cache: RwLock<HashMap<String, CacheEntry>>,
    /// Maximum cache size
    max_size: usize,
    /// Global access counter
    access_counter: RwLock<u64>,
    /// Cache statistics
    stats: RwLock<CacheStats>,
}

impl ScoreCache {
    /// Create a new score cache with default capacity.
    pub fn new(scorer: Arc<dyn RelevanceScorer>) -> Self {
        Self::with_capacity(scorer, DEFAULT_CACHE_SIZE)
    }

    /// Create a new score cache with specified capacity.
    pub fn with_capacity(scorer: Arc<dyn RelevanceScorer>, max_size: usize) -> Self {
        Self {
            scorer,
            cache: RwLock::new(HashMap::new()),
            max_size,
            access_counter: RwLock::new(0),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Compute the cache key for a query/text pair.
    fn key(&self, query: &str, text: &str) -> String {
        format!(
            "{}:{}:{}",
            self.scorer.model_id(),
            blake3::hash(query.as_bytes()).to_hex(),
            blake3::hash(text.as_bytes()).to_hex()
        )
    }

    /// Get the next access count.
    async fn next_access(&self) -> u64 {
        let mut counter = self.access_counter.write().await;
        *counter += 1;
        *counter
    }

    /// Evict oldest entries if the cache is full.
    async fn maybe_evict(&self) {
        let mut cache = self.cache.write().await;

        if cache.len() < self.max_size {
            return;
        }

        // Evict the oldest 10%
        let evict_count = (self.max_size / 10).max(1);
        let mut entries: Vec<_> = cache
            .iter()
            .map(|(k, v)| (k.clone(), v.access_count))
            .collect();
        entries.sort_by_key(|(_, count)| *count);

        let mut stats = self.stats.write().await;
        for (key, _) in entries.into_iter().take(evict_count) {
            cache.remove(&key);
            stats.evictions += 1;
        }
    }

    /// Current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }
}

#[async_trait]
impl RelevanceScorer for ScoreCache {
    fn model_id(&self) -> &str {
        self.scorer.model_id()
    }

    async fn score(&self, query: &str, text: &str) -> Result<f32, CapabilityError> {
        let key = self.key(query, text);

        {
            let mut cache = self.cache.write().await;
            if let Some(entry) = cache.get_mut(&key) {
                self.stats.write().await.hits += 1;
                entry.access_count = {
                    let mut counter = self.access_counter.write().await;
                    *counter += 1;
                    *counter
                };
                debug!(key = %key, "score cache hit");
                return Ok(entry.score);
            }
        }

        self.stats.write().await.misses += 1;
        let score = self.scorer.score(query, text).await?;

        self.maybe_evict().await;
        let access_count = self.next_access().await;
        self.cache
            .write()
            .await
            .insert(key, CacheEntry { score, access_count });

        Ok(score)
    }
}
