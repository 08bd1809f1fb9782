use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::models::CompatibilityBreakdown;

/// Identity of one scoring call
///
/// Revisions change whenever a profile is replaced or the weights are tuned,
/// so a hit is always a breakdown computed from the current inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub viewer_id: String,
    pub viewer_revision: u64,
    pub candidate_id: String,
    pub candidate_revision: u64,
    pub weights_revision: u64,
}

/// In-process cache of compatibility breakdowns
pub struct BreakdownCache {
    entries: moka::future::Cache<CacheKey, CompatibilityBreakdown>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl BreakdownCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<CompatibilityBreakdown> {
        let found = self.entries.get(key).await;
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Breakdown cache hit: {} -> {}", key.viewer_id, key.candidate_id);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub async fn insert(&self, key: CacheKey, breakdown: CompatibilityBreakdown) {
        self.entries.insert(key, breakdown).await;
    }

    /// Cached breakdown for `key`, computing and storing it on a miss
    pub async fn get_or_score<F>(&self, key: CacheKey, score: F) -> CompatibilityBreakdown
    where
        F: FnOnce() -> CompatibilityBreakdown,
    {
        if let Some(breakdown) = self.get(&key).await {
            return breakdown;
        }
        let breakdown = score();
        self.insert(key, breakdown.clone()).await;
        breakdown
    }

    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
        tracing::debug!("Breakdown cache invalidated");
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            size: self.entries.entry_count(),
            hit_count: hits,
            miss_count: misses,
            hit_rate: if lookups > 0 { hits as f64 / lookups as f64 } else { 0.0 },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: u64,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}
