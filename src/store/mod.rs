//! Embedding store: immutable unit vectors plus a bijective word ↔ row index.

pub mod container;

use rapidfuzz::distance::jaro_winkler;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{GameEngineError, Result};

pub use container::{EmbeddingContainer, PrepareStats};

#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    dims: usize,
    words: Vec<String>,
    index: HashMap<String, usize>,
    matrix: Vec<f32>,
}

impl EmbeddingStore {
    /// Build from a flat row-major matrix. Every row is L2-normalized here.
    pub fn from_parts(dims: usize, words: Vec<String>, mut matrix: Vec<f32>) -> Result<Self> {
        if dims == 0 {
            return Err(GameEngineError::StartupData("embedding dimension is zero".into()));
        }
        if words.is_empty() {
            return Err(GameEngineError::StartupData("embedding vocabulary is empty".into()));
        }
        if words.len() * dims != matrix.len() {
            return Err(GameEngineError::StartupData(format!(
                "embedding length mismatch: {} words x {} dims != {} values",
                words.len(),
                dims,
                matrix.len()
            )));
        }

        let mut index = HashMap::with_capacity(words.len());
        for (row, word) in words.iter().enumerate() {
            if index.insert(word.clone(), row).is_some() {
                return Err(GameEngineError::StartupData(format!(
                    "duplicate vocabulary word: {word}"
                )));
            }
        }

        let degenerate = matrix
            .par_chunks_mut(dims)
            .enumerate()
            .filter_map(|(row, values)| {
                let norm = values.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm == 0.0 || !norm.is_finite() {
                    return Some(row);
                }
                values.iter_mut().for_each(|x| *x /= norm);
                None
            })
            .min();
        if let Some(row) = degenerate {
            return Err(GameEngineError::StartupData(format!(
                "embedding for '{}' has zero or non-finite norm",
                words[row]
            )));
        }

        Ok(Self {
            dims,
            words,
            index,
            matrix,
        })
    }

    /// Convenience constructor from one vector per word.
    pub fn from_rows<S: Into<String>>(rows: impl IntoIterator<Item = (S, Vec<f32>)>) -> Result<Self> {
        let mut words = Vec::new();
        let mut matrix = Vec::new();
        let mut dims = None;
        for (word, vector) in rows {
            let word = word.into();
            if *dims.get_or_insert(vector.len()) != vector.len() {
                return Err(GameEngineError::StartupData(format!(
                    "embedding for '{word}' has {} dims",
                    vector.len()
                )));
            }
            words.push(word);
            matrix.extend(vector);
        }
        Self::from_parts(dims.unwrap_or(0), words, matrix)
    }

    pub fn from_container(container: EmbeddingContainer) -> Result<Self> {
        Self::from_parts(container.dims, container.words, container.vecs)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let store = Self::from_container(EmbeddingContainer::load(path)?)?;
        tracing::info!(
            "Loaded {} embeddings ({} dims) from {}",
            store.len(),
            store.dims(),
            path.display()
        );
        Ok(store)
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn row_of(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn word_at(&self, row: usize) -> &str {
        &self.words[row]
    }

    pub fn all_words(&self) -> &[String] {
        &self.words
    }

    pub fn row(&self, row: usize) -> &[f32] {
        &self.matrix[row * self.dims..(row + 1) * self.dims]
    }

    /// The flat row-major matrix.
    pub fn matrix(&self) -> &[f32] {
        &self.matrix
    }

    pub fn vector_of(&self, word: &str) -> Result<&[f32]> {
        self.row_of(word)
            .map(|row| self.row(row))
            .ok_or_else(|| GameEngineError::UnknownWord(word.to_string()))
    }

    /// Cosine similarity of two vocabulary words.
    pub fn similarity(&self, w1: &str, w2: &str) -> Result<f32> {
        Ok(dot(self.vector_of(w1)?, self.vector_of(w2)?))
    }

    pub fn row_similarity(&self, r1: usize, r2: usize) -> f32 {
        dot(self.row(r1), self.row(r2))
    }

    /// Closest spellings in the vocabulary, best first.
    pub fn suggest(&self, word: &str, limit: usize) -> Vec<String> {
        let query = word.to_lowercase();
        let mut scored: Vec<(f64, &String)> = self
            .words
            .par_iter()
            .map(|candidate| {
                let score = jaro_winkler::normalized_similarity(query.chars(), candidate.chars());
                (score, candidate)
            })
            .filter(|(score, _)| *score >= 0.8)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, w)| w.clone())
            .collect()
    }
}

#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
