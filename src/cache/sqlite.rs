use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::{pair_key, CacheStats, CachedRanking, RankingCache};
use crate::error::{GameEngineError, Result};

/// SQLite-based ranking cache implementation
///
/// ```sql
/// CREATE TABLE ranking_cache (
///     pair_key TEXT NOT NULL,
///     fingerprint TEXT NOT NULL DEFAULT '',
///     prefix TEXT NOT NULL,
///     hit_count INTEGER DEFAULT 0,
///     cached_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
///     PRIMARY KEY (pair_key, fingerprint)
/// );
/// ```
///
/// Lookups, saves and hit counts are scoped to the handle's fingerprint.
/// Stats and cleanup cover the whole table.
pub struct SqliteRankingCache {
    conn: Arc<Mutex<Connection>>,
    fingerprint: String,
}

impl SqliteRankingCache {
    /// Create new SQLite cache (`":memory:"` for a process-local one)
    pub async fn new(db_path: &str) -> Result<Self> {
        Self::with_fingerprint(db_path, "").await
    }

    /// Open a cache whose entries are tied to one ranking fingerprint
    pub async fn with_fingerprint(db_path: &str, fingerprint: impl Into<String>) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS ranking_cache (
                pair_key TEXT NOT NULL,
                fingerprint TEXT NOT NULL DEFAULT '',
                prefix TEXT NOT NULL,
                hit_count INTEGER DEFAULT 0,
                cached_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (pair_key, fingerprint)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_ranking_cached_at ON ranking_cache(cached_at)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            fingerprint: fingerprint.into(),
        })
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| GameEngineError::Cache("connection mutex poisoned".into()))
    }
}

/// Accepts RFC 3339 text or a Unix timestamp in seconds
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| raw.parse::<i64>().ok().and_then(|ts| DateTime::from_timestamp(ts, 0)))
}

fn timestamp_query(conn: &Connection, sql: &str) -> Option<DateTime<Utc>> {
    conn.query_row(sql, [], |row| row.get::<_, Option<String>>(0))
        .ok()
        .flatten()
        .and_then(|s| parse_timestamp(&s))
}

#[async_trait]
impl RankingCache for SqliteRankingCache {
    async fn get(&self, seed1: &str, seed2: &str) -> Result<Option<CachedRanking>> {
        let key = pair_key(seed1, seed2);
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT prefix, hit_count, cached_at FROM ranking_cache
                 WHERE pair_key = ?1 AND fingerprint = ?2",
                params![key, self.fingerprint],
                |row| {
                    let prefix_json: String = row.get(0)?;
                    let hit_count: i32 = row.get(1)?;
                    let cached_at: Option<String> = row.get(2)?;
                    Ok((prefix_json, hit_count, cached_at))
                },
            )
            .optional()?;

        let Some((prefix_json, hit_count, cached_at)) = row else {
            return Ok(None);
        };

        let prefix: Vec<String> = serde_json::from_str(&prefix_json)?;
        let cached_at = cached_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);

        Ok(Some(CachedRanking {
            key,
            prefix,
            hit_count,
            cached_at,
        }))
    }

    async fn save(&self, seed1: &str, seed2: &str, prefix: &[String]) -> Result<()> {
        let key = pair_key(seed1, seed2);
        let prefix_json = serde_json::to_string(prefix)?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT OR REPLACE INTO ranking_cache (pair_key, fingerprint, prefix, hit_count, cached_at)
             VALUES (?1, ?2, ?3, COALESCE((SELECT hit_count FROM ranking_cache
                                           WHERE pair_key = ?1 AND fingerprint = ?2), 0), ?4)",
            params![key, self.fingerprint, prefix_json, Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }

    async fn increment_hit(&self, seed1: &str, seed2: &str) -> Result<()> {
        let key = pair_key(seed1, seed2);
        let conn = self.conn()?;

        conn.execute(
            "UPDATE ranking_cache SET hit_count = hit_count + 1
             WHERE pair_key = ?1 AND fingerprint = ?2",
            params![key, self.fingerprint],
        )?;

        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let conn = self.conn()?;

        let total_entries: u64 =
            conn.query_row("SELECT COUNT(*) FROM ranking_cache", [], |row| row.get(0))?;

        let total_hits: u64 = conn.query_row(
            "SELECT COALESCE(SUM(hit_count), 0) FROM ranking_cache",
            [],
            |row| row.get(0),
        )?;

        let avg_hit_count = if total_entries > 0 {
            total_hits as f64 / total_entries as f64
        } else {
            0.0
        };

        Ok(CacheStats {
            total_entries,
            total_hits,
            avg_hit_count,
            oldest_entry: timestamp_query(&conn, "SELECT MIN(cached_at) FROM ranking_cache"),
            newest_entry: timestamp_query(&conn, "SELECT MAX(cached_at) FROM ranking_cache"),
        })
    }

    async fn cleanup(&self, max_age_days: i64) -> Result<u64> {
        let conn = self.conn()?;

        let cutoff_date = Utc::now() - chrono::Duration::days(max_age_days);

        let deleted = conn.execute(
            "DELETE FROM ranking_cache WHERE cached_at < ?",
            params![cutoff_date.to_rfc3339()],
        )?;

        Ok(deleted as u64)
    }
}
