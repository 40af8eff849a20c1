use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use crate::error::{GameEngineError, Result};

/// On-disk embedding format: two aligned datasets.
///
/// `vecs` is the row-major N×D matrix flattened, `words` the N row labels.
/// Rows are expected to be unit length; `EmbeddingStore` re-normalizes on load anyway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingContainer {
    pub dims: usize,
    pub words: Vec<String>,
    pub vecs: Vec<f32>,
}

/// Summary of a text import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrepareStats {
    pub kept: usize,
    pub other_language: usize,
    pub duplicates: usize,
    pub malformed: usize,
}

impl EmbeddingContainer {
    pub fn rows(&self) -> usize {
        self.words.len()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| GameEngineError::io(path, e))?;
        let container: EmbeddingContainer = bincode::deserialize_from(BufReader::new(file))?;
        Ok(container)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| GameEngineError::io(path, e))?;
        bincode::serialize_into(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Import a ConceptNet Numberbatch style text file.
    ///
    /// Each line is `term v1 v2 ... vD`, optionally preceded by a `N D` header.
    /// Terms shaped like `/c/<lang>/word` are kept only for `lang` and stripped to
    /// `word`; terms without a `/c/` prefix are kept as-is. Rows are L2-normalized,
    /// zero rows and rows of the wrong width are dropped.
    pub fn prepare_from_text<R: BufRead>(reader: R, lang: &str) -> Result<(Self, PrepareStats)> {
        let prefix = format!("/c/{lang}/");
        let mut stats = PrepareStats::default();
        let mut seen = HashSet::new();
        let mut words = Vec::new();
        let mut vecs = Vec::new();
        let mut dims: Option<usize> = None;

        for (lineno, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| GameEngineError::io("<embedding text>", e))?;
            let mut fields = line.split_whitespace();
            let Some(term) = fields.next() else {
                continue;
            };

            let values: Vec<&str> = fields.collect();
            if lineno == 0 && values.len() == 1 && term.parse::<usize>().is_ok() {
                dims = values[0].parse().ok();
                continue;
            }

            let word = if let Some(stripped) = term.strip_prefix(&prefix) {
                stripped
            } else if term.starts_with("/c/") {
                stats.other_language += 1;
                continue;
            } else {
                term
            };

            let row: Option<Vec<f32>> = values.iter().map(|v| v.parse().ok()).collect();
            let Some(mut row) = row else {
                stats.malformed += 1;
                continue;
            };
            let width = *dims.get_or_insert(row.len());
            if row.len() != width || width == 0 {
                stats.malformed += 1;
                continue;
            }

            let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm == 0.0 || !norm.is_finite() {
                stats.malformed += 1;
                continue;
            }
            row.iter_mut().for_each(|x| *x /= norm);

            if !seen.insert(word.to_string()) {
                stats.duplicates += 1;
                continue;
            }

            words.push(word.to_string());
            vecs.extend_from_slice(&row);
            stats.kept += 1;
        }

        let dims = dims.unwrap_or(0);
        if words.is_empty() || dims == 0 {
            return Err(GameEngineError::StartupData(format!(
                "no usable '{lang}' rows in embedding text"
            )));
        }

        Ok((Self { dims, words, vecs }, stats))
    }
}
