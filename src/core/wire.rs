//! JSON shapes of the game's HTTP surface.

use serde::{Deserialize, Serialize};

use crate::core::MoveOutcome;

/// Body of `POST /next_word`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextWordRequest {
    pub word1: String,
    pub word2: String,
    /// Words played earlier this round, oldest first
    #[serde(default)]
    pub past: Vec<String>,
}

impl NextWordRequest {
    pub fn new(word1: impl Into<String>, word2: impl Into<String>) -> Self {
        Self {
            word1: word1.into(),
            word2: word2.into(),
            past: Vec::new(),
        }
    }

    pub fn with_past<S: Into<String>>(mut self, past: impl IntoIterator<Item = S>) -> Self {
        self.past = past.into_iter().map(Into::into).collect();
        self
    }
}

/// Reply to `POST /next_word`. Exactly one of three shapes:
///
/// - `{"unknownWord": true}`
/// - `{"unknownWord": false, "victory": true}`
/// - `{"unknownWord": false, "victory": false, "nextWord": "...", "simScore": 0.5}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextWordResponse {
    pub unknown_word: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victory: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_word: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sim_score: Option<f64>,

    /// Close spellings offered when a word is unknown
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl NextWordResponse {
    pub fn unknown(suggestions: Vec<String>) -> Self {
        Self {
            unknown_word: true,
            victory: None,
            next_word: None,
            sim_score: None,
            suggestions,
        }
    }

    pub fn victory() -> Self {
        Self {
            unknown_word: false,
            victory: Some(true),
            next_word: None,
            sim_score: None,
            suggestions: Vec::new(),
        }
    }

    pub fn next(word: impl Into<String>, sim_score: f32) -> Self {
        Self {
            unknown_word: false,
            victory: Some(false),
            next_word: Some(word.into()),
            sim_score: Some(f64::from(sim_score)),
            suggestions: Vec::new(),
        }
    }
}

impl From<MoveOutcome> for NextWordResponse {
    fn from(outcome: MoveOutcome) -> Self {
        match outcome {
            MoveOutcome::UnknownWord { .. } => NextWordResponse::unknown(Vec::new()),
            MoveOutcome::Victory => NextWordResponse::victory(),
            MoveOutcome::NextWord { word, sim_score } => NextWordResponse::next(word, sim_score),
        }
    }
}

/// Reply to `GET /first_word`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstWordResponse {
    pub word: String,
}

/// Structured error body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
