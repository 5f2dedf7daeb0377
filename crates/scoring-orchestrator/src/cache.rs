//! In-process TTL cache for scoring results.

use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

use scoring_core::{ResultCache, ScoringConfig, ScoringResult};

pub const SCORING_NAMESPACE: &str = "scoring";

const KEY_HASH_LEN: usize = 16;

/// Internal cache entry with insertion time and its own TTL
struct CacheEntry {
    data: ScoringResult,
    cached_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() >= self.ttl
    }
}

/// Deterministic key for a company under a given configuration:
/// `score:{companyId}:{hash prefix of weights and custom parameters}`
pub fn cache_key(company_id: &str, config: &ScoringConfig) -> String {
    let mut hasher = Sha256::new();
    for weight in config.weights.as_array() {
        hasher.update(weight.to_le_bytes());
    }
    for (name, value) in &config.custom_parameters {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(value.to_string().as_bytes());
        hasher.update([0u8]);
    }
    let digest = hex::encode(hasher.finalize());
    format!("score:{}:{}", company_id, &digest[..KEY_HASH_LEN])
}

/// Bounded DashMap cache; expired entries are dropped on read and evicted
/// first when the cache is full, then the oldest entry goes.
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
    max_entries: usize,
}

impl TtlCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    fn full_key(key: &str, namespace: &str) -> String {
        format!("{}:{}", namespace, key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before.saturating_sub(self.entries.len())
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().cached_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            tracing::debug!("Evicted oldest cache entry {}", key);
        }
    }
}

#[async_trait]
impl ResultCache for TtlCache {
    async fn get(&self, key: &str, namespace: &str) -> Option<ScoringResult> {
        let full_key = Self::full_key(key, namespace);
        let expired = match self.entries.get(&full_key) {
            Some(entry) if !entry.is_expired() => return Some(entry.data.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove_if(&full_key, |_, entry| entry.is_expired());
        }
        None
    }

    async fn set(&self, key: &str, value: ScoringResult, ttl: Duration, namespace: &str) {
        let full_key = Self::full_key(key, namespace);
        if !self.entries.contains_key(&full_key) && self.entries.len() >= self.max_entries {
            self.purge_expired();
            if self.entries.len() >= self.max_entries {
                self.evict_oldest();
            }
        }
        self.entries.insert(
            full_key,
            CacheEntry {
                data: value,
                cached_at: Instant::now(),
                ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_core::{fixtures, WeightConfig};

    fn result(company_id: &str) -> ScoringResult {
        let mut result = crate::tests::sample_result();
        result.company_id = company_id.to_string();
        result
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        let config = ScoringConfig::default();
        let key = cache_key("helix-therapeutics", &config);
        assert_eq!(key, cache_key("helix-therapeutics", &config.clone()));
        assert!(key.starts_with("score:helix-therapeutics:"));
        assert_eq!(key.len(), "score:helix-therapeutics:".len() + KEY_HASH_LEN);
    }

    #[test]
    fn test_cache_key_tracks_config() {
        let base = ScoringConfig::default();
        let reweighted = ScoringConfig::with_weights(WeightConfig::uniform(1.0 / 6.0));
        let mut parameterised = ScoringConfig::default();
        parameterised
            .custom_parameters
            .insert("horizon".to_string(), serde_json::json!(5));

        let key = cache_key("c", &base);
        assert_ne!(key, cache_key("c", &reweighted));
        assert_ne!(key, cache_key("c", &parameterised));
        assert_ne!(key, cache_key("d", &base));
    }

    #[tokio::test]
    async fn test_get_respects_namespace_and_ttl() {
        let cache = TtlCache::new(10);
        cache.set("k", result("a"), Duration::from_secs(60), SCORING_NAMESPACE).await;
        assert!(cache.get("k", SCORING_NAMESPACE).await.is_some());
        assert!(cache.get("k", "other").await.is_none());

        cache.set("short", result("b"), Duration::from_millis(20), SCORING_NAMESPACE).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get("short", SCORING_NAMESPACE).await.is_none());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_full_cache_evicts_expired_then_oldest() {
        let cache = TtlCache::new(2);
        cache.set("old", result("a"), Duration::from_secs(60), SCORING_NAMESPACE).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.set("newer", result("b"), Duration::from_secs(60), SCORING_NAMESPACE).await;
        cache.set("newest", result("c"), Duration::from_secs(60), SCORING_NAMESPACE).await;

        assert_eq!(cache.len(), 2);
        assert!(cache.get("old", SCORING_NAMESPACE).await.is_none());
        assert!(cache.get("newest", SCORING_NAMESPACE).await.is_some());

        let expiring = TtlCache::new(2);
        expiring.set("stale", result("a"), Duration::from_millis(1), SCORING_NAMESPACE).await;
        expiring.set("fresh", result("b"), Duration::from_secs(60), SCORING_NAMESPACE).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        expiring.set("third", result("c"), Duration::from_secs(60), SCORING_NAMESPACE).await;
        assert!(expiring.get("fresh", SCORING_NAMESPACE).await.is_some());
        assert!(expiring.get("third", SCORING_NAMESPACE).await.is_some());
    }

    #[test]
    fn test_fixture_company_id_feeds_key() {
        let company = fixtures::sample_company();
        assert!(cache_key(&company.id, &ScoringConfig::default()).contains(&company.id));
    }
}
