pub mod sqlite;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::RankingConfig;
use crate::core::GameData;
use crate::error::Result;

pub use sqlite::SqliteRankingCache;

/// Trait for ranking cache implementations
///
/// Scores are symmetric in the seeds, so implementations must treat `(a, b)`
/// and `(b, a)` as the same key.
#[async_trait]
pub trait RankingCache: Send + Sync {
    /// Get the memoized ranking prefix for a seed pair
    async fn get(&self, seed1: &str, seed2: &str) -> Result<Option<CachedRanking>>;

    /// Store the top of a ranking, best first
    async fn save(&self, seed1: &str, seed2: &str, prefix: &[String]) -> Result<()>;

    /// Increment cache hit counter
    async fn increment_hit(&self, seed1: &str, seed2: &str) -> Result<()>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats>;

    /// Clear expired entries (older than `max_age_days`)
    async fn cleanup(&self, max_age_days: i64) -> Result<u64>;
}

/// Canonical cache key for a seed pair
pub fn pair_key(seed1: &str, seed2: &str) -> String {
    if seed1 <= seed2 {
        format!("{seed1}|{seed2}")
    } else {
        format!("{seed2}|{seed1}")
    }
}

/// Identifies everything a ranking depends on besides the seeds: the ranker,
/// its tier settings, the vocabulary with its vectors and the frequencies.
///
/// Entries saved under one fingerprint are invisible under any other, so a
/// shared database never replays a prefix computed from different inputs.
pub fn ranking_fingerprint(data: &GameData, ranker: &str, config: &RankingConfig) -> String {
    let store = data.store();
    let mut hasher = blake3::Hasher::new();

    hasher.update(ranker.as_bytes());
    for value in [
        config.distant_threshold,
        config.related_threshold,
        config.distant_modifier,
        config.related_modifier,
        config.close_modifier,
    ] {
        hasher.update(&value.to_le_bytes());
    }

    hasher.update(&(store.dims() as u64).to_le_bytes());
    hasher.update(&(store.len() as u64).to_le_bytes());
    for word in store.all_words() {
        hasher.update(word.as_bytes());
        hasher.update(&[0]);
    }
    for value in store.matrix().iter().chain(data.row_frequencies()) {
        hasher.update(&value.to_le_bytes());
    }

    hasher.finalize().to_hex().as_str()[..16].to_string()
}

/// Cached ranking prefix with metadata
#[derive(Debug, Clone)]
pub struct CachedRanking {
    pub key: String,
    pub prefix: Vec<String>,
    pub hit_count: i32,
    pub cached_at: chrono::DateTime<chrono::Utc>,
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total_entries: u64,
    pub total_hits: u64,
    pub avg_hit_count: f64,
    pub oldest_entry: Option<chrono::DateTime<chrono::Utc>>,
    pub newest_entry: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{WordSet, ZipfTable};
    use crate::store::EmbeddingStore;

    #[test]
    fn test_pair_key_canonical() {
        assert_eq!(pair_key("dog", "cat"), "cat|dog");
        assert_eq!(pair_key("cat", "dog"), "cat|dog");
        assert_eq!(pair_key("dog", "dog"), "dog|dog");
    }

    fn data(pet: [f32; 3], pet_zipf: f32) -> GameData {
        let store = EmbeddingStore::from_rows([
            ("dog", vec![1.0, 0.2, 0.8]),
            ("cat", vec![0.2, 1.0, 0.8]),
            ("pet", pet.to_vec()),
        ])
        .unwrap();
        let zipf: ZipfTable = [("dog", 5.2), ("cat", 5.0), ("pet", pet_zipf)]
            .into_iter()
            .collect();
        let first: WordSet = ["dog"].into_iter().collect();
        GameData::new(store, zipf, WordSet::default(), first).unwrap()
    }

    #[test]
    fn test_fingerprint_tracks_ranking_inputs() {
        let base = data([0.6, 0.6, 1.0], 4.5);
        let config = RankingConfig::default();
        let fingerprint = ranking_fingerprint(&base, "embedding", &config);

        assert_eq!(fingerprint.len(), 16);
        assert_eq!(fingerprint, ranking_fingerprint(&data([0.6, 0.6, 1.0], 4.5), "embedding", &config));

        let close = RankingConfig {
            close_modifier: 0.5,
            ..config
        };
        assert_ne!(fingerprint, ranking_fingerprint(&base, "embedding", &close));
        assert_ne!(fingerprint, ranking_fingerprint(&base, "other", &config));
        assert_ne!(fingerprint, ranking_fingerprint(&data([0.0, 0.6, 1.0], 4.5), "embedding", &config));
        assert_ne!(fingerprint, ranking_fingerprint(&data([0.6, 0.6, 1.0], 3.0), "embedding", &config));
    }
}
