use rayon::prelude::*;
use tracing::debug;

use crate::config::RankingConfig;
use crate::core::GameData;
use crate::error::Result;
use crate::ranking::{RankedCandidates, Ranker};
use crate::store::dot;

/// How far apart the two seeds are. Picks the weight given to word frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyTier {
    Distant,
    Related,
    Close,
}

impl FrequencyTier {
    pub fn name(&self) -> &'static str {
        match self {
            FrequencyTier::Distant => "distant",
            FrequencyTier::Related => "related",
            FrequencyTier::Close => "close",
        }
    }
}

/// Scores each word by how well it bridges both seeds, nudged towards common words.
///
/// `score(w) = sim(w, s1) * sim(w, s2) + zipf(w) / modifier`
///
/// Distant seeds get a large modifier, so frequency barely matters and the
/// product term dominates.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingRanker {
    config: RankingConfig,
}

impl EmbeddingRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn tier_for(&self, closeness: f32) -> FrequencyTier {
        if closeness < self.config.distant_threshold {
            FrequencyTier::Distant
        } else if closeness < self.config.related_threshold {
            FrequencyTier::Related
        } else {
            FrequencyTier::Close
        }
    }

    pub fn modifier(&self, tier: FrequencyTier) -> f32 {
        match tier {
            FrequencyTier::Distant => self.config.distant_modifier,
            FrequencyTier::Related => self.config.related_modifier,
            FrequencyTier::Close => self.config.close_modifier,
        }
    }

    /// Unordered score per vocabulary row.
    pub fn scores(&self, data: &GameData, seed1: usize, seed2: usize) -> Vec<f32> {
        let store = data.store();
        let closeness = store.row_similarity(seed1, seed2);
        let tier = self.tier_for(closeness);
        let modifier = self.modifier(tier);
        debug!(
            "Ranking '{}' + '{}': closeness {:.4}, tier {} (modifier {})",
            store.word_at(seed1),
            store.word_at(seed2),
            closeness,
            tier.name(),
            modifier
        );

        let v1 = store.row(seed1);
        let v2 = store.row(seed2);
        store
            .matrix()
            .par_chunks(store.dims())
            .zip(data.row_frequencies().par_iter())
            .map(|(vec, &zipf)| dot(vec, v1) * dot(vec, v2) + zipf / modifier)
            .collect()
    }
}

impl Ranker for EmbeddingRanker {
    fn rank(&self, data: &GameData, seed1: usize, seed2: usize) -> Result<RankedCandidates> {
        Ok(RankedCandidates::from_scores(self.scores(data, seed1, seed2)))
    }

    fn name(&self) -> &str {
        "embedding"
    }
}
