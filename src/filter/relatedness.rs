use crate::stemming::{StemEnsemble, Stems};

/// A word together with its stems, so repeated comparisons stem it only once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemmedWord {
    pub word: String,
    pub stems: Stems,
}

/// Decides whether two words are lexical variants of each other.
///
/// Deliberately permissive: a shared stem under any strategy, or a literal prefix,
/// is enough. "cat"/"cats", "run"/"running" and "sun"/"sunflower" are all related.
#[derive(Debug, Default)]
pub struct RelatednessFilter {
    ensemble: StemEnsemble,
}

impl RelatednessFilter {
    pub fn new() -> Self {
        Self {
            ensemble: StemEnsemble::new(),
        }
    }

    pub fn ensemble(&self) -> &StemEnsemble {
        &self.ensemble
    }

    pub fn stemmed(&self, word: &str) -> StemmedWord {
        StemmedWord {
            word: word.to_string(),
            stems: self.ensemble.stems(word),
        }
    }

    pub fn related(&self, a: &str, b: &str) -> bool {
        is_prefix_pair(a, b) || self.share_stem(a, b)
    }

    /// Stem agreement only, ignoring the prefix rule.
    pub fn share_stem(&self, a: &str, b: &str) -> bool {
        self.ensemble.stems(a).shares_root(&self.ensemble.stems(b))
    }

    pub fn related_stemmed(&self, a: &StemmedWord, b: &StemmedWord) -> bool {
        is_prefix_pair(&a.word, &b.word) || a.stems.shares_root(&b.stems)
    }
}

fn is_prefix_pair(a: &str, b: &str) -> bool {
    a.starts_with(b) || b.starts_with(a)
}
