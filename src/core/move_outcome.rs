use serde::{Deserialize, Serialize};

/// Result of asking the engine for its next move.
///
/// `NoCandidateFound` is not an outcome: it surfaces as an error so callers must
/// decide how to end the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// A supplied word is outside the vocabulary
    UnknownWord { word: String },
    /// Both seed words share a stem: the players converged
    Victory,
    /// The engine's reply and how close the two seeds were
    NextWord { word: String, sim_score: f32 },
}

impl MoveOutcome {
    pub fn is_victory(&self) -> bool {
        matches!(self, MoveOutcome::Victory)
    }

    pub fn next_word(&self) -> Option<&str> {
        match self {
            MoveOutcome::NextWord { word, .. } => Some(word),
            _ => None,
        }
    }

    /// Display string for logging
    pub fn display(&self) -> String {
        match self {
            MoveOutcome::UnknownWord { word } => format!("unknown word '{word}'"),
            MoveOutcome::Victory => "victory".to_string(),
            MoveOutcome::NextWord { word, sim_score } => format!("{word} (sim {sim_score:.3})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let next = MoveOutcome::NextWord {
            word: "pet".into(),
            sim_score: 0.62,
        };
        assert_eq!(next.next_word(), Some("pet"));
        assert!(!next.is_victory());
        assert!(MoveOutcome::Victory.is_victory());
        assert_eq!(MoveOutcome::Victory.next_word(), None);
    }

    #[test]
    fn test_display() {
        let unknown = MoveOutcome::UnknownWord { word: "qzx".into() };
        assert_eq!(unknown.display(), "unknown word 'qzx'");
    }
}
