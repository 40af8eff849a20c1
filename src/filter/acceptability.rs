use std::fmt;
use std::sync::Arc;

use crate::config::FilterConfig;
use crate::core::GameData;
use crate::error::{GameEngineError, Result};
use crate::filter::relatedness::{RelatednessFilter, StemmedWord};
use crate::lexicon::is_alphabetic_word;
use crate::stemming::StemStrategy;

/// Why a candidate was turned down.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    NotInVocabulary,
    TooRare { zipf: f32 },
    TooCommon { zipf: f32 },
    NotAlphabetic,
    Blocked,
    RelatedTo(String),
    NearDuplicate { similarity_sum: f32, root_zipf: f32 },
}

impl Rejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::NotInVocabulary => "not_in_vocabulary",
            Rejection::TooRare { .. } => "too_rare",
            Rejection::TooCommon { .. } => "too_common",
            Rejection::NotAlphabetic => "not_alphabetic",
            Rejection::Blocked => "blocked",
            Rejection::RelatedTo(_) => "related",
            Rejection::NearDuplicate { .. } => "near_duplicate",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::RelatedTo(word) => write!(f, "related to '{word}'"),
            Rejection::TooRare { zipf } | Rejection::TooCommon { zipf } => {
                write!(f, "{} (zipf {zipf:.2})", self.kind())
            }
            Rejection::NearDuplicate {
                similarity_sum,
                root_zipf,
            } => write!(
                f,
                "near duplicate (similarity sum {similarity_sum:.2}, root zipf {root_zipf:.2})"
            ),
            other => f.write_str(other.kind()),
        }
    }
}

/// Words already played this round, canonical and known to the vocabulary.
#[derive(Debug, Clone)]
pub struct History {
    words: Vec<StemmedWord>,
    /// Rows of the trailing window used by the near-duplicate rule
    recent_rows: Vec<usize>,
}

impl History {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.word.as_str())
    }
}

/// Decides whether a candidate may be played.
#[derive(Debug)]
pub struct AcceptabilityFilter {
    data: Arc<GameData>,
    relatedness: RelatednessFilter,
    config: FilterConfig,
}

impl AcceptabilityFilter {
    pub fn new(data: Arc<GameData>, config: FilterConfig) -> Self {
        Self {
            data,
            relatedness: RelatednessFilter::new(),
            config,
        }
    }

    pub fn relatedness(&self) -> &RelatednessFilter {
        &self.relatedness
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Stem the history once and resolve the trailing window to rows.
    pub fn history<S: AsRef<str>>(&self, words: &[S]) -> Result<History> {
        let store = self.data.store();
        let window_start = words.len().saturating_sub(self.config.history_window);

        let mut stemmed = Vec::with_capacity(words.len());
        let mut recent_rows = Vec::with_capacity(words.len() - window_start);
        for (i, word) in words.iter().enumerate() {
            let word = word.as_ref();
            let row = store
                .row_of(word)
                .ok_or_else(|| GameEngineError::UnknownWord(word.to_string()))?;
            if i >= window_start {
                recent_rows.push(row);
            }
            stemmed.push(self.relatedness.stemmed(word));
        }

        Ok(History {
            words: stemmed,
            recent_rows,
        })
    }

    pub fn acceptable(&self, candidate: &str, history: &History) -> bool {
        self.check(candidate, history).is_ok()
    }

    pub fn check(&self, candidate: &str, history: &History) -> std::result::Result<(), Rejection> {
        let row = self
            .data
            .store()
            .row_of(candidate)
            .ok_or(Rejection::NotInVocabulary)?;
        self.check_row(row, history)
    }

    /// Rules run cheapest first; the first failing rule is reported.
    pub fn check_row(&self, row: usize, history: &History) -> std::result::Result<(), Rejection> {
        let store = self.data.store();
        let candidate = store.word_at(row);
        let zipf = self.data.row_zipf(row);

        if zipf < self.config.min_zipf {
            return Err(Rejection::TooRare { zipf });
        }
        if zipf > self.config.max_zipf {
            return Err(Rejection::TooCommon { zipf });
        }
        if !is_alphabetic_word(candidate) {
            return Err(Rejection::NotAlphabetic);
        }
        if self.data.blocklist().contains(candidate) {
            return Err(Rejection::Blocked);
        }

        let stemmed = self.relatedness.stemmed(candidate);
        if let Some(previous) = history
            .words
            .iter()
            .find(|previous| self.relatedness.related_stemmed(&stemmed, previous))
        {
            return Err(Rejection::RelatedTo(previous.word.clone()));
        }

        let similarity_sum: f32 = history
            .recent_rows
            .iter()
            .map(|&r| store.row_similarity(row, r))
            .sum();
        if similarity_sum > self.config.near_duplicate_similarity {
            let root = stemmed.stems.get(StemStrategy::Porter);
            let root_zipf = zipf.max(self.data.zipf(root));
            if root_zipf < self.config.near_duplicate_root_zipf {
                return Err(Rejection::NearDuplicate {
                    similarity_sum,
                    root_zipf,
                });
            }
        }

        Ok(())
    }
}
