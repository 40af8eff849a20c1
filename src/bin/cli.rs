use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use wordlink_engine::lexicon::standardize;
use wordlink_engine::stemming::StemStrategy;
use wordlink_engine::store::EmbeddingContainer;
use wordlink_engine::{EngineConfig, GameEngine, NextWordRequest, RankingCache, SqliteRankingCache};

#[derive(Parser)]
#[command(name = "wordlink-cli")]
#[command(about = "Wordlink Game Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML config file
    #[arg(short, long, env = "WORDLINK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw an opening word
    FirstWord {
        /// Fixed RNG seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Ask the engine for its reply to two words
    NextWord {
        word1: String,
        word2: String,

        /// Words already played this round
        #[arg(short, long, num_args = 1..)]
        past: Vec<String>,
    },

    /// Cosine similarity of two words
    Similarity { word1: String, word2: String },

    /// Show what the engine knows about a word
    Lookup { word: String },

    /// Convert a Numberbatch text file into an embedding container
    Prepare {
        /// Numberbatch text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output container path
        #[arg(short, long)]
        output: PathBuf,

        /// Language of `/c/<lang>/` terms to keep
        #[arg(short, long, default_value = "en")]
        lang: String,
    },

    /// Get cache statistics
    Stats,

    /// Clean up old cache entries
    Cleanup {
        /// Maximum age in days
        #[arg(short, long, default_value = "30")]
        max_age_days: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordlink_engine=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_yaml_file(path)?,
        None => EngineConfig::default(),
    };
    config.apply_env();

    match cli.command {
        Commands::FirstWord { seed } => {
            if seed.is_some() {
                config.selector.rng_seed = seed;
            }
            config.cache.enabled = false;
            let engine = GameEngine::new(config).await?;

            println!("🎲 {}", engine.first_word()?.word);
        }

        Commands::NextWord { word1, word2, past } => {
            let engine = GameEngine::new(config).await?;
            let response = engine
                .next_word(NextWordRequest::new(&word1, &word2).with_past(past))
                .await?;

            if response.unknown_word {
                println!("❓ Unknown word");
                if !response.suggestions.is_empty() {
                    println!("   Did you mean: {}", response.suggestions.join(", "));
                }
            } else if response.victory == Some(true) {
                println!("🏆 Victory! '{}' and '{}' meet", word1, word2);
            } else if let Some(next) = response.next_word {
                println!("➡️  {}", next);
                println!("   Seed similarity: {:.4}", response.sim_score.unwrap_or_default());
            }
        }

        Commands::Similarity { word1, word2 } => {
            config.cache.enabled = false;
            let engine = GameEngine::new(config).await?;
            let store = engine.selector().data().store();

            let (w1, w2) = (standardize(&word1), standardize(&word2));
            let similarity = store.similarity(&w1, &w2)?;
            println!("📐 sim({}, {}) = {:.4}", w1, w2, similarity);
        }

        Commands::Lookup { word } => {
            config.cache.enabled = false;
            let engine = GameEngine::new(config).await?;
            let data = engine.selector().data();
            let word = standardize(&word);

            match data.store().row_of(&word) {
                Some(row) => {
                    let filter = engine.selector().filter();
                    let stems = filter.relatedness().ensemble().stems(&word);
                    println!("📖 {}", word);
                    println!("   Row: {}", row);
                    println!("   Zipf: {:.2}", data.row_zipf(row));
                    println!("   Blocked: {}", data.blocklist().contains(&word));
                    for strategy in StemStrategy::ALL {
                        println!("   Stem ({}): {}", strategy.name(), stems.get(strategy));
                    }
                }
                None => {
                    println!("❓ '{}' is not in the vocabulary", word);
                    let suggestions = data.store().suggest(&word, 5);
                    if !suggestions.is_empty() {
                        println!("   Did you mean: {}", suggestions.join(", "));
                    }
                }
            }
        }

        Commands::Prepare { input, output, lang } => {
            println!("📥 Reading {}", input.display());

            let file = File::open(&input)
                .with_context(|| format!("failed to open {}", input.display()))?;
            let (container, stats) =
                EmbeddingContainer::prepare_from_text(BufReader::new(file), &lang)?;
            container.save(&output)?;

            println!("✅ Wrote {} words ({} dims) to {}", stats.kept, container.dims, output.display());
            println!("   Other language: {}", stats.other_language);
            println!("   Duplicates: {}", stats.duplicates);
            println!("   Malformed: {}", stats.malformed);
        }

        Commands::Stats => {
            let cache = SqliteRankingCache::new(&config.cache.db_path).await?;
            let stats = cache.stats().await?;

            println!("📊 Cache Statistics:");
            println!("   Total entries: {}", stats.total_entries);
            println!("   Total hits: {}", stats.total_hits);
            println!("   Avg hits/entry: {:.2}", stats.avg_hit_count);

            if let Some(oldest) = stats.oldest_entry {
                println!("   Oldest entry: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
            }

            if let Some(newest) = stats.newest_entry {
                println!("   Newest entry: {}", newest.format("%Y-%m-%d %H:%M:%S"));
            }
        }

        Commands::Cleanup { max_age_days } => {
            println!("🧹 Cleaning up entries older than {} days...", max_age_days);

            let cache = SqliteRankingCache::new(&config.cache.db_path).await?;
            let deleted = cache.cleanup(max_age_days).await?;

            println!("✅ Deleted {} entries", deleted);
        }
    }

    Ok(())
}
