use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the word game engine
#[derive(Error, Debug)]
pub enum GameEngineError {
    /// A supplied word is outside the vocabulary
    #[error("Unknown word: {0}")]
    UnknownWord(String),

    /// Ranking exhausted the vocabulary without an acceptable candidate
    #[error("No acceptable candidate found for '{word1}' + '{word2}'")]
    NoCandidateFound { word1: String, word2: String },

    /// Candidate scan exceeded its deadline
    #[error("Candidate scan timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Missing, corrupt or inconsistent startup data
    #[error("Startup data error: {0}")]
    StartupData(String),

    /// File errors, tagged with the offending path
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Embedding container encoding errors
    #[error("Embedding container error: {0}")]
    Container(#[from] bincode::Error),

    /// Config file errors
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl GameEngineError {
    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GameEngineError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error prevents the engine from serving at all
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameEngineError::StartupData(_)
                | GameEngineError::Io { .. }
                | GameEngineError::Container(_)
                | GameEngineError::Config(_)
        )
    }

    /// Stable machine-readable code for error bodies
    pub fn code(&self) -> &'static str {
        match self {
            GameEngineError::UnknownWord(_) => "unknownWord",
            GameEngineError::NoCandidateFound { .. } => "noCandidateFound",
            GameEngineError::Timeout { .. } => "timeout",
            GameEngineError::Cache(_) | GameEngineError::Database(_) => "cacheUnavailable",
            _ => "internal",
        }
    }
}

impl From<String> for GameEngineError {
    fn from(s: String) -> Self {
        GameEngineError::Other(s)
    }
}

impl From<&str> for GameEngineError {
    fn from(s: &str) -> Self {
        GameEngineError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GameEngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(GameEngineError::StartupData("empty".into()).is_fatal());
        assert!(!GameEngineError::UnknownWord("qzx".into()).is_fatal());
        assert!(!GameEngineError::NoCandidateFound {
            word1: "a".into(),
            word2: "b".into(),
        }
        .is_fatal());
    }

    #[test]
    fn test_codes() {
        let err = GameEngineError::NoCandidateFound {
            word1: "a".into(),
            word2: "b".into(),
        };
        assert_eq!(err.code(), "noCandidateFound");
        assert_eq!(GameEngineError::Timeout { elapsed_ms: 5 }.code(), "timeout");
        assert_eq!(GameEngineError::Other("x".into()).code(), "internal");
    }

    #[test]
    fn test_display() {
        let err = GameEngineError::NoCandidateFound {
            word1: "dog".into(),
            word2: "cat".into(),
        };
        assert_eq!(
            err.to_string(),
            "No acceptable candidate found for 'dog' + 'cat'"
        );
    }
}
