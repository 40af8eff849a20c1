//! # Wordlink Game Engine
//!
//! Engine for a cooperative word-association game. Two players each say a word;
//! the engine answers with a word that bridges both, until the two words share
//! a stem.
//!
//! - Unit-normalized word embeddings with cosine similarity
//! - Stem-ensemble relatedness and frequency-window filtering
//! - Parallel candidate scoring (rayon) with lazy best-first draws
//! - Optional SQLite memo of ranking prefixes
//! - Interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use wordlink_engine::{EngineConfig, GameEngine, NextWordRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = GameEngine::new(EngineConfig::default()).await?;
//!
//!     let opening = engine.first_word()?;
//!     let reply = engine
//!         .next_word(NextWordRequest::new(&opening.word, "cat"))
//!         .await?;
//!
//!     println!("{:?}", reply.next_word);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod filter;
pub mod lexicon;
pub mod ranking;
pub mod selector;
pub mod stemming;
pub mod store;

// Re-export primary types
pub use cache::{CacheStats, RankingCache, SqliteRankingCache};
pub use config::EngineConfig;
pub use core::{
    ErrorResponse, FirstWordResponse, GameData, MoveOutcome, NextWordRequest, NextWordResponse,
};
pub use engine::GameEngine;
pub use error::{GameEngineError, Result};
pub use selector::MoveSelector;
pub use store::EmbeddingStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
