use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wordlink_engine::cache::{RankingCache, SqliteRankingCache};

fn prefix(len: usize) -> Vec<String> {
    (0..len).map(|i| format!("candidate{}", i)).collect()
}

async fn setup_cache() -> SqliteRankingCache {
    let cache = SqliteRankingCache::new(":memory:").await.unwrap();

    // Populate with test data
    let words = prefix(256);
    for i in 0..100 {
        cache
            .save(&format!("seed{}", i), "anchor", &words)
            .await
            .unwrap();
    }

    cache
}

fn bench_cache_get(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let cache = runtime.block_on(setup_cache());

    c.bench_function("cache_get_hit", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(cache.get("anchor", "seed50").await.unwrap()) });
    });

    c.bench_function("cache_get_miss", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(cache.get("anchor", "nonexistent").await.unwrap()) });
    });
}

fn bench_cache_save(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let cache = runtime.block_on(SqliteRankingCache::new(":memory:")).unwrap();
    let words = prefix(256);

    c.bench_function("cache_save_256", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(cache.save("dog", "cat", &words).await.unwrap()) });
    });
}

fn bench_cache_increment(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let cache = runtime.block_on(setup_cache());

    c.bench_function("cache_increment_hit", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(cache.increment_hit("seed50", "anchor").await.unwrap()) });
    });
}

criterion_group!(
    benches,
    bench_cache_get,
    bench_cache_save,
    bench_cache_increment
);
criterion_main!(benches);
