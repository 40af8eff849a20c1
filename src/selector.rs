//! Move selection: opening words, victory detection and the candidate scan.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::config::{EngineConfig, SelectorConfig};
use crate::core::{GameData, MoveOutcome};
use crate::error::{GameEngineError, Result};
use crate::filter::{AcceptabilityFilter, History};
use crate::ranking::{EmbeddingRanker, Ranker};

/// The deadline is only consulted once per this many candidates.
const DEADLINE_CHECK_INTERVAL: usize = 256;

/// A move that passed vocabulary and victory checks and needs a candidate scan.
#[derive(Debug, Clone)]
pub struct PendingMove {
    pub word1: String,
    pub word2: String,
    pub seed1: usize,
    pub seed2: usize,
    /// Similarity of the two seeds, echoed back to the client
    pub sim_score: f32,
    /// `past ++ [word1, word2]`
    history: History,
}

impl PendingMove {
    pub fn history(&self) -> &History {
        &self.history
    }
}

/// First stage of `pick_next_word`, before any ranking work.
#[derive(Debug, Clone)]
pub enum Classified {
    Unknown(String),
    Victory,
    Playable(PendingMove),
}

/// Output of a candidate scan.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedMove {
    pub word: String,
    pub sim_score: f32,
    /// Top of a freshly computed ranking, for the caller to memoize
    pub fresh_prefix: Option<Vec<String>>,
    /// Candidates examined before one was accepted
    pub scanned: usize,
}

/// Running tally of one scan.
struct Scan {
    started: Instant,
    timeout: Duration,
    scanned: usize,
    rejections: BTreeMap<&'static str, usize>,
}

impl Scan {
    fn new(timeout: Duration) -> Self {
        Self {
            started: Instant::now(),
            timeout,
            scanned: 0,
            rejections: BTreeMap::new(),
        }
    }

    fn tick(&mut self) -> Result<()> {
        if self.scanned % DEADLINE_CHECK_INTERVAL == 0 {
            let elapsed = self.started.elapsed();
            if elapsed > self.timeout {
                return Err(GameEngineError::Timeout {
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }
        }
        self.scanned += 1;
        Ok(())
    }

    fn reject(&mut self, kind: &'static str) {
        *self.rejections.entry(kind).or_insert(0) += 1;
    }
}

pub struct MoveSelector {
    data: Arc<GameData>,
    filter: AcceptabilityFilter,
    ranker: Arc<dyn Ranker>,
    config: SelectorConfig,
    /// Eligible opening words, sorted for reproducible seeded draws
    first_word_pool: Vec<String>,
}

impl MoveSelector {
    pub fn new(data: Arc<GameData>, config: &EngineConfig) -> Result<Self> {
        let ranker = Arc::new(EmbeddingRanker::new(config.ranking));
        Self::with_ranker(data, ranker, config)
    }

    pub fn with_ranker(
        data: Arc<GameData>,
        ranker: Arc<dyn Ranker>,
        config: &EngineConfig,
    ) -> Result<Self> {
        let selector = config.selector;
        let first_word_pool: Vec<String> = data
            .first_words()
            .sorted()
            .into_iter()
            .filter(|w| data.store().contains(w) && data.zipf(w) >= selector.first_word_min_zipf)
            .map(str::to_string)
            .collect();

        if first_word_pool.is_empty() {
            return Err(GameEngineError::StartupData(format!(
                "none of the {} first-word candidates is in the vocabulary with zipf >= {}",
                data.first_words().len(),
                selector.first_word_min_zipf
            )));
        }

        info!(
            "Move selector ready: {} words, {} opening words, ranker '{}'",
            data.store().len(),
            first_word_pool.len(),
            ranker.name()
        );

        Ok(Self {
            filter: AcceptabilityFilter::new(Arc::clone(&data), config.filter),
            data,
            ranker,
            config: selector,
            first_word_pool,
        })
    }

    pub fn data(&self) -> &Arc<GameData> {
        &self.data
    }

    pub fn filter(&self) -> &AcceptabilityFilter {
        &self.filter
    }

    pub fn first_word_pool(&self) -> &[String] {
        &self.first_word_pool
    }

    pub fn ranker(&self) -> &dyn Ranker {
        self.ranker.as_ref()
    }

    /// Uniform draw from the opening pool.
    ///
    /// `with_ranker` refuses an empty pool, so the `StartupData` error is only
    /// reachable if that invariant is broken.
    pub fn pick_first_word<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str> {
        self.first_word_pool
            .choose(rng)
            .map(String::as_str)
            .ok_or_else(|| GameEngineError::StartupData("first-word pool is empty".into()))
    }

    /// Vocabulary and victory checks. Inputs must already be standardized.
    pub fn classify<S: AsRef<str>>(&self, word1: &str, word2: &str, past: &[S]) -> Result<Classified> {
        let store = self.data.store();
        let (Some(seed1), Some(seed2)) = (store.row_of(word1), store.row_of(word2)) else {
            let unknown = if store.contains(word1) { word2 } else { word1 };
            return Ok(Classified::Unknown(unknown.to_string()));
        };

        let mut words: Vec<&str> = past.iter().map(|w| w.as_ref()).collect();
        words.push(word1);
        words.push(word2);
        let history = match self.filter.history(&words) {
            Ok(history) => history,
            Err(GameEngineError::UnknownWord(word)) => return Ok(Classified::Unknown(word)),
            Err(e) => return Err(e),
        };

        if self.filter.relatedness().share_stem(word1, word2) {
            return Ok(Classified::Victory);
        }

        Ok(Classified::Playable(PendingMove {
            word1: word1.to_string(),
            word2: word2.to_string(),
            seed1,
            seed2,
            sim_score: store.row_similarity(seed1, seed2),
            history,
        }))
    }

    /// Find the best acceptable candidate.
    ///
    /// `cached` is a previously memoized ranking prefix for the same seeds; it is
    /// tried first, then the full ranking is scanned without revisiting it. When
    /// `cached` is absent, the top `prefix_len` words of the new ranking are
    /// returned in `fresh_prefix`.
    pub fn play(
        &self,
        pending: &PendingMove,
        cached: Option<&[String]>,
        prefix_len: usize,
    ) -> Result<SelectedMove> {
        let store = self.data.store();
        let mut scan = Scan::new(Duration::from_millis(self.config.scan_timeout_ms));
        let mut checked: HashSet<usize> = HashSet::new();

        if let Some(prefix) = cached {
            for word in prefix {
                scan.tick()?;
                let Some(row) = store.row_of(word) else {
                    continue;
                };
                checked.insert(row);
                match self.filter.check_row(row, &pending.history) {
                    Ok(()) => return Ok(self.selected(pending, word.clone(), None, &scan)),
                    Err(rejection) => scan.reject(rejection.kind()),
                }
            }
            debug!(
                "Cached prefix for '{}' + '{}' exhausted, falling back to full ranking",
                pending.word1, pending.word2
            );
        }

        let mut ranked = self.ranker.rank(&self.data, pending.seed1, pending.seed2)?;

        let fresh_prefix = if cached.is_none() && prefix_len > 0 {
            let head: Vec<usize> = ranked.by_ref().take(prefix_len).map(|c| c.row).collect();
            let words: Vec<String> = head.iter().map(|&r| store.word_at(r).to_string()).collect();
            for &row in &head {
                scan.tick()?;
                match self.filter.check_row(row, &pending.history) {
                    Ok(()) => {
                        let word = store.word_at(row).to_string();
                        return Ok(self.selected(pending, word, Some(words), &scan));
                    }
                    Err(rejection) => scan.reject(rejection.kind()),
                }
            }
            Some(words)
        } else {
            None
        };

        for candidate in ranked {
            if checked.contains(&candidate.row) {
                continue;
            }
            scan.tick()?;
            match self.filter.check_row(candidate.row, &pending.history) {
                Ok(()) => {
                    let word = store.word_at(candidate.row).to_string();
                    return Ok(self.selected(pending, word, fresh_prefix, &scan));
                }
                Err(rejection) => scan.reject(rejection.kind()),
            }
        }

        debug!("Rejections for '{}' + '{}': {:?}", pending.word1, pending.word2, scan.rejections);
        Err(GameEngineError::NoCandidateFound {
            word1: pending.word1.clone(),
            word2: pending.word2.clone(),
        })
    }

    /// Uncached `classify` followed by `play`.
    pub fn pick_next_word<S: AsRef<str>>(&self, word1: &str, word2: &str, past: &[S]) -> Result<MoveOutcome> {
        match self.classify(word1, word2, past)? {
            Classified::Unknown(word) => Ok(MoveOutcome::UnknownWord { word }),
            Classified::Victory => Ok(MoveOutcome::Victory),
            Classified::Playable(pending) => {
                let selected = self.play(&pending, None, 0)?;
                Ok(MoveOutcome::NextWord {
                    word: selected.word,
                    sim_score: selected.sim_score,
                })
            }
        }
    }

    fn selected(
        &self,
        pending: &PendingMove,
        word: String,
        fresh_prefix: Option<Vec<String>>,
        scan: &Scan,
    ) -> SelectedMove {
        debug!(
            "'{}' + '{}' -> '{}' after {} candidates in {:?}, rejections {:?}",
            pending.word1,
            pending.word2,
            word,
            scan.scanned,
            scan.started.elapsed(),
            scan.rejections
        );
        SelectedMove {
            word,
            sim_score: pending.sim_score,
            fresh_prefix,
            scanned: scan.scanned,
        }
    }
}

impl std::fmt::Debug for MoveSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveSelector")
            .field("ranker", &self.ranker.name())
            .field("config", &self.config)
            .field("first_word_pool", &self.first_word_pool.len())
            .finish()
    }
}
