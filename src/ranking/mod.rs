pub mod candidates;
pub mod embedding;

use crate::core::GameData;
use crate::error::Result;

pub use candidates::RankedCandidates;
pub use embedding::{EmbeddingRanker, FrequencyTier};

/// Trait for candidate ranking implementations
pub trait Ranker: Send + Sync {
    /// Score the whole vocabulary against the seed rows, best first
    fn rank(&self, data: &GameData, seed1: usize, seed2: usize) -> Result<RankedCandidates>;

    /// Get ranker name for logging
    fn name(&self) -> &str;
}

/// Vocabulary row with its score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    pub row: usize,
    pub score: f32,
}

impl RankedCandidate {
    pub fn new(row: usize, score: f32) -> Self {
        Self { row, score }
    }
}
