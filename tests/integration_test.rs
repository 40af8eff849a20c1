use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use wordlink_engine::filter::RelatednessFilter;
use wordlink_engine::lexicon::{standardize, WordSet, ZipfTable};
use wordlink_engine::ranking::{EmbeddingRanker, FrequencyTier, RankedCandidates, Ranker};
use wordlink_engine::store::EmbeddingContainer;
use wordlink_engine::{
    EmbeddingStore, EngineConfig, GameData, GameEngine, GameEngineError, NextWordRequest,
};

const FIXTURE: &[(&str, [f32; 6], f32)] = &[
    ("dog", [1.0, 0.2, 0.8, 0.1, 0.1, 0.0], 5.2),
    ("cat", [0.2, 1.0, 0.8, 0.1, 0.0, 0.0], 5.0),
    ("dogs", [1.0, 0.25, 0.8, 0.1, 0.1, 0.0], 4.6),
    ("cats", [0.25, 1.0, 0.8, 0.1, 0.0, 0.0], 4.4),
    ("pet", [0.6, 0.6, 1.0, 0.0, 0.0, 0.0], 4.5),
    // blocklisted, outranks pet for dog + cat
    ("darn", [0.6, 0.6, 1.0, 0.0, 0.0, 0.05], 5.0),
    // too rare
    ("xylophone", [0.6, 0.6, 1.0, 0.05, 0.0, 0.0], 1.8),
    // too common
    ("the", [0.5, 0.5, 0.9, 0.1, 0.1, 0.3], 7.7),
    // not alphabetic
    ("##th", [0.6, 0.6, 1.0, 0.0, 0.05, 0.0], 3.0),
    ("animal", [0.5, 0.5, 0.6, 0.6, 0.0, 0.0], 4.8),
    ("puppy", [0.9, 0.1, 0.9, 0.0, 0.1, 0.0], 4.0),
    ("kitten", [0.1, 0.9, 0.9, 0.0, 0.0, 0.0], 4.0),
    ("zebra", [0.1, 0.2, 0.0, 1.0, 0.0, 0.0], 3.6),
    ("run", [0.0, 0.0, 0.0, 0.1, 1.0, 0.0], 5.5),
    ("running", [0.0, 0.0, 0.0, 0.1, 1.0, 0.1], 5.0),
    ("runner", [0.0, 0.0, 0.0, 0.2, 1.0, 0.0], 4.2),
    ("sprint", [0.0, 0.0, 0.0, 0.0, 1.0, 0.2], 3.9),
    ("leash", [0.8, 0.0, 0.6, 0.0, 0.3, 0.0], 3.0),
    ("of", [0.2, 0.2, 0.2, 0.2, 0.2, 1.0], 7.4),
];

const FIRST_WORDS: &[&str] = &["dog", "cat", "zebra", "xylophone", "run", "unicorn"];

fn fixture_data() -> Arc<GameData> {
    let store =
        EmbeddingStore::from_rows(FIXTURE.iter().map(|(w, v, _)| (*w, v.to_vec()))).unwrap();
    let zipf: ZipfTable = FIXTURE.iter().map(|(w, _, z)| (*w, *z)).collect();
    let blocklist: WordSet = ["darn"].into_iter().collect();
    let first: WordSet = FIRST_WORDS.iter().copied().collect();
    Arc::new(GameData::new(store, zipf, blocklist, first).unwrap())
}

fn uncached_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.cache.enabled = false;
    config
}

async fn engine() -> GameEngine {
    GameEngine::with_data(fixture_data(), uncached_config())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_dog_cat_scenario() {
    let engine = engine().await;
    let data = fixture_data();

    let response = engine
        .next_word(NextWordRequest::new("dog", "cat"))
        .await
        .unwrap();

    assert!(!response.unknown_word);
    assert_eq!(response.victory, Some(false));
    assert_eq!(response.next_word.as_deref(), Some("pet"));

    let expected = data.store().similarity("dog", "cat").unwrap();
    let sim_score = response.sim_score.unwrap();
    assert!((sim_score - f64::from(expected)).abs() < 1e-6);
    assert!((sim_score - 0.6195).abs() < 1e-3);

    // once pet is played, the next bridge is animal
    let response = engine
        .next_word(NextWordRequest::new("dog", "cat").with_past(["pet"]))
        .await
        .unwrap();
    assert_eq!(response.next_word.as_deref(), Some("animal"));
}

#[tokio::test]
async fn test_response_json_shape() {
    let engine = engine().await;

    let response = engine
        .next_word(NextWordRequest::new("dog", "cat"))
        .await
        .unwrap();
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["unknownWord"], false);
    assert_eq!(value["victory"], false);
    assert_eq!(value["nextWord"], "pet");
    assert!(value["simScore"].is_f64());
}

#[tokio::test]
async fn test_victory() {
    let engine = engine().await;

    for (w1, w2) in [("run", "running"), ("dog", "dog"), ("Cats", "cat")] {
        let response = engine.next_word(NextWordRequest::new(w1, w2)).await.unwrap();
        assert_eq!(response.victory, Some(true), "{w1} + {w2}");
        assert!(response.next_word.is_none());
    }
}

#[tokio::test]
async fn test_unknown_word() {
    let engine = engine().await;

    let response = engine
        .next_word(NextWordRequest::new("qzxnotaword", "cat"))
        .await
        .unwrap();
    assert!(response.unknown_word);
    assert!(response.victory.is_none());
    assert!(response.next_word.is_none());

    let response = engine
        .next_word(NextWordRequest::new("dog", "cat").with_past(["qzxnotaword"]))
        .await
        .unwrap();
    assert!(response.unknown_word);
}

#[tokio::test]
async fn test_unknown_word_suggestions() {
    let engine = engine().await;

    let response = engine
        .next_word(NextWordRequest::new("zebraa", "cat"))
        .await
        .unwrap();
    assert!(response.unknown_word);
    assert_eq!(response.suggestions.first().map(String::as_str), Some("zebra"));
}

#[test]
fn test_frequency_tiers() {
    let data = fixture_data();
    let store = data.store();
    let ranker = EmbeddingRanker::default();

    let close = store.similarity("dog", "cat").unwrap();
    let related = store.similarity("dog", "zebra").unwrap();
    let distant = store.similarity("dog", "run").unwrap();

    assert_eq!(ranker.tier_for(close), FrequencyTier::Close);
    assert_eq!(ranker.tier_for(related), FrequencyTier::Related);
    assert_eq!(ranker.tier_for(distant), FrequencyTier::Distant);
}

#[tokio::test]
async fn test_related_tier_scenario() {
    let engine = engine().await;

    let response = engine
        .next_word(NextWordRequest::new("dog", "zebra"))
        .await
        .unwrap();
    assert_eq!(response.next_word.as_deref(), Some("animal"));

    // runner, running and run are all variants of a seed
    let response = engine
        .next_word(NextWordRequest::new("run", "zebra"))
        .await
        .unwrap();
    assert_eq!(response.next_word.as_deref(), Some("animal"));
}

#[tokio::test]
async fn test_no_candidate_found() {
    let mut config = uncached_config();
    config.filter.min_zipf = 6.5;
    config.filter.max_zipf = 6.6;
    let engine = GameEngine::with_data(fixture_data(), config).await.unwrap();

    let err = engine
        .next_word(NextWordRequest::new("dog", "cat"))
        .await
        .unwrap_err();
    assert!(matches!(err, GameEngineError::NoCandidateFound { .. }));
    assert_eq!(err.code(), "noCandidateFound");
}

/// Ranker that is too slow for any deadline
struct SlowRanker;

impl Ranker for SlowRanker {
    fn rank(&self, data: &GameData, _seed1: usize, _seed2: usize) -> wordlink_engine::Result<RankedCandidates> {
        std::thread::sleep(Duration::from_millis(50));
        Ok(RankedCandidates::from_scores(vec![0.0; data.store().len()]))
    }

    fn name(&self) -> &str {
        "slow"
    }
}

#[tokio::test]
async fn test_scan_timeout() {
    let mut config = uncached_config();
    config.selector.scan_timeout_ms = 10;
    let engine = GameEngine::with_ranker(fixture_data(), Arc::new(SlowRanker), config)
        .await
        .unwrap();

    let err = engine
        .next_word(NextWordRequest::new("dog", "cat"))
        .await
        .unwrap_err();
    assert!(matches!(err, GameEngineError::Timeout { elapsed_ms } if elapsed_ms >= 10));
}

#[tokio::test]
async fn test_never_returns_related_word() {
    let engine = engine().await;
    let relatedness = RelatednessFilter::new();

    let rounds: &[(&str, &str, &[&str])] = &[
        ("dog", "cat", &[]),
        ("dog", "cat", &["pet"]),
        ("dog", "cat", &["pet", "animal"]),
        ("dog", "zebra", &[]),
        ("run", "zebra", &["animal"]),
        ("pet", "kitten", &[]),
        ("puppy", "leash", &["dog"]),
        ("sprint", "cat", &[]),
    ];

    for (w1, w2, past) in rounds {
        let request = NextWordRequest::new(*w1, *w2).with_past(past.iter().copied());
        let response = match engine.next_word(request).await {
            Ok(response) => response,
            Err(GameEngineError::NoCandidateFound { .. }) => continue,
            Err(e) => panic!("unexpected error for {w1} + {w2}: {e}"),
        };
        let Some(next) = response.next_word else {
            continue;
        };

        let history = past.iter().chain([w1, w2]);
        for previous in history {
            assert!(
                !relatedness.related(&next, previous),
                "{next} is related to {previous} ({w1} + {w2}, past {past:?})"
            );
        }
    }
}

#[tokio::test]
async fn test_first_word_seeded() {
    let mut config = uncached_config();
    config.selector.rng_seed = Some(2024);

    let a = GameEngine::with_data(fixture_data(), config.clone()).await.unwrap();
    let b = GameEngine::with_data(fixture_data(), config).await.unwrap();

    assert_eq!(
        a.selector().first_word_pool(),
        &["cat", "dog", "run", "zebra"]
    );

    for _ in 0..20 {
        let word = a.first_word().unwrap().word;
        assert!(["cat", "dog", "run", "zebra"].contains(&word.as_str()));
        assert_eq!(word, b.first_word().unwrap().word);
    }
}

#[tokio::test]
async fn test_cache_hit_same_result() {
    let engine = GameEngine::with_data(fixture_data(), EngineConfig::default())
        .await
        .unwrap();

    let fresh = engine
        .next_word(NextWordRequest::new("dog", "cat"))
        .await
        .unwrap();
    let cached = engine
        .next_word(NextWordRequest::new("cat", "dog"))
        .await
        .unwrap();
    assert_eq!(fresh.next_word, cached.next_word);

    // a longer history misses inside the cached prefix
    let deeper = engine
        .next_word(NextWordRequest::new("dog", "cat").with_past(["pet"]))
        .await
        .unwrap();
    assert_eq!(deeper.next_word.as_deref(), Some("animal"));

    let stats = engine.cache_stats().await.unwrap();
    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.total_hits, 2);
}

#[test]
fn test_standardize_properties() {
    for raw in ["  Hello World ", "to be", "ice-cream", "1984", "Café", "to", "it's"] {
        let once = standardize(raw);
        assert_eq!(standardize(&once), once, "not idempotent for {raw:?}");
    }
    assert_eq!(standardize("1984"), "####");
    assert_eq!(standardize("a1"), "a1");
}

#[test]
fn test_similarity_properties() {
    let data = fixture_data();
    let store = data.store();

    for (word, _, _) in FIXTURE {
        let self_sim = store.similarity(word, word).unwrap();
        assert!((self_sim - 1.0).abs() < 1e-5, "{word}: {self_sim}");
    }
    assert_eq!(
        store.similarity("dog", "zebra").unwrap(),
        store.similarity("zebra", "dog").unwrap()
    );
}

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("wordlink-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[tokio::test]
async fn test_shared_cache_respects_ranking_config() {
    let dir = TempDir::new("shared-cache");
    let db_path = dir.0.join("cache.db").to_str().unwrap().to_string();

    let mut default_config = EngineConfig::default();
    default_config.cache.db_path = db_path.clone();

    let mut frequency_heavy = default_config.clone();
    frequency_heavy.ranking.close_modifier = 0.5;

    let a = GameEngine::with_data(fixture_data(), default_config.clone())
        .await
        .unwrap();
    let ra = a.next_word(NextWordRequest::new("dog", "cat")).await.unwrap();
    assert_eq!(ra.next_word.as_deref(), Some("pet"));

    // same db file, different tier modifier
    let b = GameEngine::with_data(fixture_data(), frequency_heavy.clone())
        .await
        .unwrap();
    let rb = b.next_word(NextWordRequest::new("dog", "cat")).await.unwrap();

    frequency_heavy.cache.enabled = false;
    let c = GameEngine::with_data(fixture_data(), frequency_heavy)
        .await
        .unwrap();
    let rc = c.next_word(NextWordRequest::new("dog", "cat")).await.unwrap();

    assert_eq!(rc.next_word.as_deref(), Some("run"));
    assert_eq!(rb.next_word, rc.next_word);

    // the original config still replays its own entry
    let a2 = GameEngine::with_data(fixture_data(), default_config)
        .await
        .unwrap();
    let ra2 = a2.next_word(NextWordRequest::new("cat", "dog")).await.unwrap();
    assert_eq!(ra2.next_word, ra.next_word);

    let stats = a2.cache_stats().await.unwrap();
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.total_hits, 1);
}

#[tokio::test]
async fn test_startup_from_files() {
    let dir = TempDir::new("startup");

    let text: String = FIXTURE
        .iter()
        .map(|(w, v, _)| {
            let values: Vec<String> = v.iter().map(|x| x.to_string()).collect();
            format!("/c/en/{} {}\n", w, values.join(" "))
        })
        .collect();
    let header = format!("{} 6\n", FIXTURE.len());
    let (container, stats) =
        EmbeddingContainer::prepare_from_text((header + &text).as_bytes(), "en").unwrap();
    assert_eq!(stats.kept, FIXTURE.len());
    container.save(dir.0.join("embeddings.bin")).unwrap();

    let frequencies: String = FIXTURE
        .iter()
        .map(|(w, _, z)| format!("{}\t{}\n", w, z))
        .collect();
    std::fs::write(dir.0.join("frequencies.tsv"), frequencies).unwrap();
    std::fs::write(dir.0.join("bad_words.txt"), "# banned\ndarn\n").unwrap();
    std::fs::write(dir.0.join("first_words.txt"), FIRST_WORDS.join("\n")).unwrap();

    let yaml = format!(
        "data:\n  embeddings: {}\n  frequencies: {}\n  blocklist: {}\n  first_words: {}\ncache:\n  enabled: false\n",
        dir.0.join("embeddings.bin").display(),
        dir.0.join("frequencies.tsv").display(),
        dir.0.join("bad_words.txt").display(),
        dir.0.join("first_words.txt").display(),
    );
    let config_path = dir.0.join("config.yaml");
    std::fs::write(&config_path, yaml).unwrap();

    let config = EngineConfig::from_yaml_file(&config_path).unwrap();
    let engine = GameEngine::new(config).await.unwrap();

    let response = engine
        .next_word(NextWordRequest::new("dog", "cat"))
        .await
        .unwrap();
    assert_eq!(response.next_word.as_deref(), Some("pet"));
}

#[tokio::test]
async fn test_missing_startup_file() {
    let dir = TempDir::new("missing");
    let mut config = uncached_config();
    config.data.embeddings = dir.0.join("absent.bin");

    let err = GameEngine::new(config).await.err().unwrap();
    assert!(err.is_fatal());
}
