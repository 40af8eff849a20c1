use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::{ranking_fingerprint, CacheStats, CachedRanking, RankingCache, SqliteRankingCache};
use crate::config::EngineConfig;
use crate::core::{FirstWordResponse, GameData, NextWordRequest, NextWordResponse};
use crate::error::{GameEngineError, Result};
use crate::lexicon::standardize;
use crate::ranking::Ranker;
use crate::selector::{Classified, MoveSelector};

/// Spelling suggestions offered for an unknown word
const SUGGESTION_LIMIT: usize = 3;

/// Main game engine orchestrator
pub struct GameEngine {
    selector: Arc<MoveSelector>,
    cache: Option<Arc<dyn RankingCache>>,
    rng: Mutex<StdRng>,
    config: EngineConfig,
}

impl GameEngine {
    /// Load the startup files named in `config` and build the engine
    pub async fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let start = Instant::now();
        let paths = config.data.clone();
        let data = tokio::task::spawn_blocking(move || GameData::load(&paths))
            .await
            .map_err(|e| GameEngineError::StartupData(format!("loader task failed: {e}")))??;

        info!(
            "✅ Loaded {} words ({} dims) in {:?}",
            data.store().len(),
            data.store().dims(),
            start.elapsed()
        );

        Self::with_data(Arc::new(data), config).await
    }

    /// Build around already loaded data
    pub async fn with_data(data: Arc<GameData>, config: EngineConfig) -> Result<Self> {
        let selector = MoveSelector::new(data, &config)?;
        Self::from_selector(selector, config).await
    }

    /// Build with a custom ranker
    pub async fn with_ranker(
        data: Arc<GameData>,
        ranker: Arc<dyn Ranker>,
        config: EngineConfig,
    ) -> Result<Self> {
        let selector = MoveSelector::with_ranker(data, ranker, &config)?;
        Self::from_selector(selector, config).await
    }

    async fn from_selector(selector: MoveSelector, config: EngineConfig) -> Result<Self> {
        let selector = Arc::new(selector);

        let cache: Option<Arc<dyn RankingCache>> = if config.cache.enabled {
            let fingerprinted = Arc::clone(&selector);
            let ranking = config.ranking;
            let fingerprint = tokio::task::spawn_blocking(move || {
                ranking_fingerprint(
                    fingerprinted.data(),
                    fingerprinted.ranker().name(),
                    &ranking,
                )
            })
            .await
            .map_err(|e| GameEngineError::Other(format!("fingerprint task failed: {e}")))?;

            let cache =
                SqliteRankingCache::with_fingerprint(&config.cache.db_path, fingerprint).await?;
            info!(
                "✅ Ranking cache at {} (fingerprint {})",
                config.cache.db_path,
                cache.fingerprint()
            );
            Some(Arc::new(cache))
        } else {
            info!("Ranking cache disabled");
            None
        };

        let rng = match config.selector.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            selector,
            cache,
            rng: Mutex::new(rng),
            config,
        })
    }

    pub fn selector(&self) -> &MoveSelector {
        &self.selector
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Draw an opening word
    pub fn first_word(&self) -> Result<FirstWordResponse> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| GameEngineError::Other("rng mutex poisoned".into()))?;
        let word = self.selector.pick_first_word(&mut *rng)?.to_string();
        debug!("First word: {}", word);
        Ok(FirstWordResponse { word })
    }

    /// Play one move
    pub async fn next_word(&self, request: NextWordRequest) -> Result<NextWordResponse> {
        let start = Instant::now();

        let word1 = standardize(&request.word1);
        let word2 = standardize(&request.word2);
        let past: Vec<String> = request.past.iter().map(|w| standardize(w)).collect();

        let pending = match self.selector.classify(&word1, &word2, &past)? {
            Classified::Unknown(word) => {
                let suggestions = self.selector.data().store().suggest(&word, SUGGESTION_LIMIT);
                info!("❓ Unknown word '{}' (suggestions: {:?})", word, suggestions);
                return Ok(NextWordResponse::unknown(suggestions));
            }
            Classified::Victory => {
                info!("🏆 Victory: '{}' + '{}'", word1, word2);
                return Ok(NextWordResponse::victory());
            }
            Classified::Playable(pending) => pending,
        };

        let cached = self.cached_prefix(&word1, &word2).await;
        let from_cache = cached.is_some();
        let prefix_len = self.config.cache.prefix_len;

        let selector = Arc::clone(&self.selector);
        let selected = tokio::task::spawn_blocking(move || {
            let prefix = cached.as_ref().map(|c| c.prefix.as_slice());
            selector.play(&pending, prefix, prefix_len)
        })
        .await
        .map_err(|e| GameEngineError::Other(format!("ranking task failed: {e}")))??;

        if let (Some(cache), Some(prefix)) = (&self.cache, &selected.fresh_prefix) {
            if let Err(e) = cache.save(&word1, &word2, prefix).await {
                warn!("Failed to save ranking to cache: {}", e);
            }
        }

        info!(
            "➡️  '{}' + '{}' -> '{}' (sim {:.3}, {} scanned, cache {}, {:.1}ms)",
            word1,
            word2,
            selected.word,
            selected.sim_score,
            selected.scanned,
            if from_cache { "hit" } else { "miss" },
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(NextWordResponse::next(selected.word, selected.sim_score))
    }

    /// Cache failures only cost a recomputation
    async fn cached_prefix(&self, word1: &str, word2: &str) -> Option<CachedRanking> {
        let cache = self.cache.as_ref()?;
        match cache.get(word1, word2).await {
            Ok(Some(cached)) => {
                if let Err(e) = cache.increment_hit(word1, word2).await {
                    warn!("Failed to record cache hit: {}", e);
                }
                Some(cached)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ranking cache lookup failed: {}", e);
                None
            }
        }
    }

    /// Get cache statistics
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        self.enabled_cache()?.stats().await
    }

    /// Clean up old cache entries
    pub async fn cleanup_cache(&self, max_age_days: i64) -> Result<u64> {
        self.enabled_cache()?.cleanup(max_age_days).await
    }

    fn enabled_cache(&self) -> Result<&Arc<dyn RankingCache>> {
        self.cache
            .as_ref()
            .ok_or_else(|| GameEngineError::Cache("ranking cache is disabled".into()))
    }
}
