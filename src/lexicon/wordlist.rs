use std::collections::HashSet;
use std::path::Path;

use crate::error::{GameEngineError, Result};

/// An immutable set of words read from a one-word-per-line list.
///
/// Used for both the profanity blocklist and the opening-word candidates.
#[derive(Debug, Clone, Default)]
pub struct WordSet {
    words: HashSet<String>,
}

impl WordSet {
    /// Lines are trimmed and lowercased; blank lines and `#` comments are skipped.
    pub fn parse_from_str(contents: &str) -> Self {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| GameEngineError::io(path, e))?;
        let set = Self::parse_from_str(&contents);
        tracing::info!("Loaded {} words from {}", set.len(), path.display());
        Ok(set)
    }

    /// Like `load_from_path`, but an empty list is a startup error.
    pub fn load_non_empty(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let set = Self::load_from_path(path)?;
        if set.is_empty() {
            return Err(GameEngineError::StartupData(format!(
                "word list {} is empty",
                path.display()
            )));
        }
        Ok(set)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in sorted order, so seeded draws are reproducible.
    pub fn sorted(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}

impl<S: Into<String>> FromIterator<S> for WordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let set = WordSet::parse_from_str("  Darn \n# comment\n\nheck\nheck\n");
        assert_eq!(set.len(), 2);
        assert!(set.contains("darn"));
        assert!(set.contains("heck"));
        assert!(!set.contains("# comment"));
    }

    #[test]
    fn test_sorted() {
        let set: WordSet = ["pear", "apple", "fig"].into_iter().collect();
        assert_eq!(set.sorted(), vec!["apple", "fig", "pear"]);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = WordSet::load_from_path("/nonexistent/list.txt").unwrap_err();
        assert!(err.is_fatal());
    }
}
