//! Stemmer ensemble.
//!
//! Stemmers disagree on edge cases, so relatedness checks run every strategy in a
//! fixed table and treat a match under any of them as a shared root.

pub mod lancaster;

use rust_stemmers::{Algorithm, Stemmer};

pub use lancaster::LancasterStemmer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StemStrategy {
    Lancaster,
    Porter,
    /// porter(lancaster(w))
    PorterAfterLancaster,
    /// lancaster(porter(w))
    LancasterAfterPorter,
}

impl StemStrategy {
    pub const ALL: [StemStrategy; 4] = [
        StemStrategy::Lancaster,
        StemStrategy::Porter,
        StemStrategy::PorterAfterLancaster,
        StemStrategy::LancasterAfterPorter,
    ];

    fn slot(self) -> usize {
        match self {
            StemStrategy::Lancaster => 0,
            StemStrategy::Porter => 1,
            StemStrategy::PorterAfterLancaster => 2,
            StemStrategy::LancasterAfterPorter => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StemStrategy::Lancaster => "lancaster",
            StemStrategy::Porter => "porter",
            StemStrategy::PorterAfterLancaster => "porter+lancaster",
            StemStrategy::LancasterAfterPorter => "lancaster+porter",
        }
    }
}

/// A word's stem under every strategy, in `StemStrategy::ALL` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stems([String; 4]);

impl Stems {
    pub fn get(&self, strategy: StemStrategy) -> &str {
        &self.0[strategy.slot()]
    }

    /// True if any strategy produced the same stem for both words.
    pub fn shares_root(&self, other: &Stems) -> bool {
        self.0.iter().zip(other.0.iter()).any(|(a, b)| a == b)
    }
}

pub struct StemEnsemble {
    porter: Stemmer,
    lancaster: LancasterStemmer,
}

impl Default for StemEnsemble {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StemEnsemble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemEnsemble")
            .field("strategies", &StemStrategy::ALL)
            .finish()
    }
}

impl StemEnsemble {
    pub fn new() -> Self {
        Self {
            porter: Stemmer::create(Algorithm::English),
            lancaster: LancasterStemmer::new(),
        }
    }

    pub fn porter(&self, word: &str) -> String {
        self.porter.stem(word).into_owned()
    }

    pub fn lancaster(&self, word: &str) -> String {
        self.lancaster.stem(word)
    }

    pub fn stem(&self, strategy: StemStrategy, word: &str) -> String {
        match strategy {
            StemStrategy::Lancaster => self.lancaster(word),
            StemStrategy::Porter => self.porter(word),
            StemStrategy::PorterAfterLancaster => self.porter(&self.lancaster(word)),
            StemStrategy::LancasterAfterPorter => self.lancaster(&self.porter(word)),
        }
    }

    pub fn stems(&self, word: &str) -> Stems {
        let porter = self.porter(word);
        let lancaster = self.lancaster(word);
        let porter_after_lancaster = self.porter(&lancaster);
        let lancaster_after_porter = self.lancaster(&porter);
        Stems([lancaster, porter, porter_after_lancaster, lancaster_after_porter])
    }
}
