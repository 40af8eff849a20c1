use std::collections::HashMap;
use std::path::Path;

use crate::error::{GameEngineError, Result};

/// Word → Zipf frequency lookup.
///
/// The Zipf scale is logarithmic: 7 is "the", 3 is a word seen about once per
/// million words, 0 means never seen. Unknown words score 0.0.
#[derive(Debug, Clone, Default)]
pub struct ZipfTable {
    entries: HashMap<String, f32>,
}

impl ZipfTable {
    /// Parse `word<TAB or space>zipf` lines. Blank lines and `#` comments are skipped;
    /// malformed lines are errors so a truncated file cannot load silently.
    pub fn parse_from_str(contents: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        for (lineno, raw_line) in contents.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let (Some(word), Some(value), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(GameEngineError::StartupData(format!(
                    "frequency line {}: expected `word zipf`, got {:?}",
                    lineno + 1,
                    line
                )));
            };

            let zipf: f32 = value.parse().map_err(|_| {
                GameEngineError::StartupData(format!(
                    "frequency line {}: invalid zipf value {:?}",
                    lineno + 1,
                    value
                ))
            })?;

            entries.insert(word.to_lowercase(), zipf);
        }

        Ok(Self { entries })
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| GameEngineError::io(path, e))?;
        let table = Self::parse_from_str(&contents)?;
        tracing::info!("Loaded {} word frequencies from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn zipf_frequency(&self, word: &str) -> f32 {
        self.entries.get(word).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f32)> for ZipfTable {
    fn from_iter<I: IntoIterator<Item = (S, f32)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(w, z)| (w.into(), z)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tabs_and_spaces() {
        let table = ZipfTable::parse_from_str("# zipf table\nthe\t7.73\n\ncat 4.87\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.zipf_frequency("the"), 7.73);
        assert_eq!(table.zipf_frequency("cat"), 4.87);
    }

    #[test]
    fn test_unknown_is_zero() {
        let table: ZipfTable = [("cat", 4.87)].into_iter().collect();
        assert_eq!(table.zipf_frequency("qzxnotaword"), 0.0);
    }

    #[test]
    fn test_malformed_line_rejected() {
        assert!(ZipfTable::parse_from_str("cat\n").is_err());
        assert!(ZipfTable::parse_from_str("cat four\n").is_err());
        assert!(ZipfTable::parse_from_str("cat 4.0 extra\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ZipfTable::load_from_path("/nonexistent/freq.tsv").unwrap_err();
        assert!(err.is_fatal());
    }
}
