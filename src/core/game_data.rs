use rayon::prelude::*;

use crate::config::DataPaths;
use crate::error::{GameEngineError, Result};
use crate::lexicon::{WordSet, ZipfTable};
use crate::store::EmbeddingStore;

/// Read-only state shared by every request for the lifetime of the process.
#[derive(Debug)]
pub struct GameData {
    store: EmbeddingStore,
    frequencies: ZipfTable,
    /// Zipf frequency per vocabulary row, aligned with the store
    row_zipf: Vec<f32>,
    blocklist: WordSet,
    first_words: WordSet,
}

impl GameData {
    pub fn new(
        store: EmbeddingStore,
        frequencies: ZipfTable,
        blocklist: WordSet,
        first_words: WordSet,
    ) -> Result<Self> {
        if first_words.is_empty() {
            return Err(GameEngineError::StartupData(
                "first-word candidate list is empty".into(),
            ));
        }

        let row_zipf = store
            .all_words()
            .par_iter()
            .map(|w| frequencies.zipf_frequency(w))
            .collect();

        Ok(Self {
            store,
            frequencies,
            row_zipf,
            blocklist,
            first_words,
        })
    }

    /// Load every startup file. Any missing or malformed file is fatal.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let store = EmbeddingStore::load(&paths.embeddings)?;
        let frequencies = ZipfTable::load_from_path(&paths.frequencies)?;
        let blocklist = WordSet::load_from_path(&paths.blocklist)?;
        let first_words = WordSet::load_non_empty(&paths.first_words)?;

        Self::new(store, frequencies, blocklist, first_words)
    }

    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    pub fn blocklist(&self) -> &WordSet {
        &self.blocklist
    }

    pub fn first_words(&self) -> &WordSet {
        &self.first_words
    }

    /// On-demand lookup, for words that may not be in the vocabulary (e.g. stems).
    pub fn zipf(&self, word: &str) -> f32 {
        self.frequencies.zipf_frequency(word)
    }

    pub fn row_zipf(&self, row: usize) -> f32 {
        self.row_zipf[row]
    }

    pub fn row_frequencies(&self) -> &[f32] {
        &self.row_zipf
    }
}
