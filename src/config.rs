//! Engine configuration.
//!
//! Every threshold used by the filters, the ranker and the selector lives here as a
//! named, tunable value. Defaults reproduce the production server's constants.
//!
//! Sources, in order of precedence (last wins):
//! 1. `EngineConfig::default()`
//! 2. a YAML file (`EngineConfig::from_yaml_file`)
//! 3. environment overrides (`EngineConfig::apply_env`)
//!
//! ```
//! use wordlink_engine::config::EngineConfig;
//!
//! let yaml = "filter:\n  min_zipf: 2.0\n";
//! let config = EngineConfig::from_yaml_str(yaml).unwrap();
//! assert_eq!(config.filter.min_zipf, 2.0);
//! assert_eq!(config.filter.max_zipf, 6.0); // default
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GameEngineError, Result};

pub const ENV_EMBEDDINGS: &str = "WORDLINK_EMBEDDINGS";
pub const ENV_FREQUENCIES: &str = "WORDLINK_FREQUENCIES";
pub const ENV_BLOCKLIST: &str = "WORDLINK_BLOCKLIST";
pub const ENV_FIRST_WORDS: &str = "WORDLINK_FIRST_WORDS";
pub const ENV_CACHE_DB: &str = "WORDLINK_CACHE_DB";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub data: DataPaths,
    pub filter: FilterConfig,
    pub ranking: RankingConfig,
    pub selector: SelectorConfig,
    pub cache: CacheConfig,
}

/// Files loaded once at startup. Absence of any of them is fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// Bincode embedding container (see `store::EmbeddingContainer`)
    pub embeddings: PathBuf,
    /// `word<TAB>zipf` lines
    pub frequencies: PathBuf,
    /// One banned word per line
    pub blocklist: PathBuf,
    /// One opening word per line
    pub first_words: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            embeddings: PathBuf::from("words/embeddings.bin"),
            frequencies: PathBuf::from("words/frequencies.tsv"),
            blocklist: PathBuf::from("words/bad_words.txt"),
            first_words: PathBuf::from("words/acceptable_first_words.txt"),
        }
    }
}

/// Acceptability thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Candidates rarer than this are obscure
    pub min_zipf: f32,
    /// Candidates more common than this are function words
    pub max_zipf: f32,
    /// How many trailing history words feed the near-duplicate sum
    pub history_window: usize,
    /// Similarity sum above which a rare candidate counts as a near-duplicate
    pub near_duplicate_similarity: f32,
    /// Root frequency below which the near-duplicate rule applies
    pub near_duplicate_root_zipf: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_zipf: 2.3,
            max_zipf: 6.0,
            history_window: 6,
            near_duplicate_similarity: 2.0,
            near_duplicate_root_zipf: 3.2,
        }
    }
}

/// Frequency modifier tiers, selected by how close the two seeds are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub distant_threshold: f32,
    pub related_threshold: f32,
    pub distant_modifier: f32,
    pub related_modifier: f32,
    pub close_modifier: f32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            distant_threshold: 0.09,
            related_threshold: 0.25,
            distant_modifier: 1000.0,
            related_modifier: 200.0,
            close_modifier: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Opening words must be at least this common
    pub first_word_min_zipf: f32,
    /// Upper bound on a single candidate scan
    pub scan_timeout_ms: u64,
    /// Fixed seed for first-word draws; entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            first_word_min_zipf: 3.5,
            scan_timeout_ms: 2_000,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub db_path: String,
    /// Number of top-ranked words memoized per seed pair
    pub prefix_len: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            db_path: ":memory:".to_string(),
            prefix_len: 256,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| GameEngineError::io(path, e))?;
        Self::from_yaml_str(&yaml)
    }

    /// Override data paths and cache location from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override from an arbitrary key lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup(ENV_EMBEDDINGS) {
            self.data.embeddings = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_FREQUENCIES) {
            self.data.frequencies = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_BLOCKLIST) {
            self.data.blocklist = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_FIRST_WORDS) {
            self.data.first_words = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_CACHE_DB) {
            self.cache.db_path = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let f = &self.filter;
        if f.min_zipf > f.max_zipf {
            return Err(GameEngineError::Other(format!(
                "filter.min_zipf ({}) exceeds filter.max_zipf ({})",
                f.min_zipf, f.max_zipf
            )));
        }
        let r = &self.ranking;
        if r.distant_threshold > r.related_threshold {
            return Err(GameEngineError::Other(format!(
                "ranking.distant_threshold ({}) exceeds ranking.related_threshold ({})",
                r.distant_threshold, r.related_threshold
            )));
        }
        if [r.distant_modifier, r.related_modifier, r.close_modifier]
            .iter()
            .any(|m| *m <= 0.0)
        {
            return Err("ranking modifiers must be positive".into());
        }
        if self.selector.scan_timeout_ms == 0 {
            return Err("selector.scan_timeout_ms must be positive".into());
        }
        Ok(())
    }
}

impl std::fmt::Display for FilterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "zipf=[{}, {}], window={}, near-dup sim>{} & root<{}",
            self.min_zipf,
            self.max_zipf,
            self.history_window,
            self.near_duplicate_similarity,
            self.near_duplicate_root_zipf
        )
    }
}
