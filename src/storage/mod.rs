use anyhow::{Context as _, Result};
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};

/// Schema bootstrap statements. All idempotent — safe to run on every start.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id         TEXT PRIMARY KEY,
        name       TEXT NOT NULL,
        email      TEXT NOT NULL UNIQUE,
        mood_tag   TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS streaks (
        user_id            TEXT NOT NULL,
        domain             TEXT NOT NULL,
        current_streak     INTEGER NOT NULL DEFAULT 0,
        longest_streak     INTEGER NOT NULL DEFAULT 0,
        last_activity_date TEXT,
        total_completed    INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (user_id, domain)
    )",
    "CREATE TABLE IF NOT EXISTS journey_paths (
        id                  TEXT PRIMARY KEY,
        name                TEXT NOT NULL,
        description         TEXT NOT NULL,
        total_milestones    INTEGER NOT NULL,
        coins_per_milestone INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS milestones (
        id                   TEXT PRIMARY KEY,
        path_id              TEXT NOT NULL REFERENCES journey_paths(id),
        order_number         INTEGER NOT NULL,
        title                TEXT NOT NULL,
        description          TEXT NOT NULL,
        kind                 TEXT NOT NULL,
        coins_reward         INTEGER NOT NULL,
        required_activities  INTEGER NOT NULL DEFAULT 1,
        reflection_prompt    TEXT,
        activity_type        TEXT,
        connection_requirement TEXT
    )",
    "CREATE TABLE IF NOT EXISTS journey_progress (
        id                   TEXT PRIMARY KEY,
        user_id              TEXT NOT NULL REFERENCES users(id),
        path_id              TEXT NOT NULL REFERENCES journey_paths(id),
        completed_milestones INTEGER NOT NULL DEFAULT 0,
        current_milestone    INTEGER NOT NULL DEFAULT 1,
        total_coins_earned   INTEGER NOT NULL DEFAULT 0,
        started_at           TEXT NOT NULL,
        UNIQUE (user_id, path_id)
    )",
    "CREATE TABLE IF NOT EXISTS milestone_progress (
        id           TEXT PRIMARY KEY,
        user_id      TEXT NOT NULL REFERENCES users(id),
        milestone_id TEXT NOT NULL REFERENCES milestones(id),
        completed    INTEGER NOT NULL DEFAULT 0,
        completed_at TEXT,
        coins_earned INTEGER NOT NULL DEFAULT 0,
        UNIQUE (user_id, milestone_id)
    )",
    "CREATE TABLE IF NOT EXISTS meditation_sessions (
        id                      TEXT PRIMARY KEY,
        user_id                 TEXT NOT NULL REFERENCES users(id),
        duration_minutes        INTEGER NOT NULL,
        ambient_sound           TEXT,
        status                  TEXT NOT NULL DEFAULT 'in_progress',
        started_at              TEXT NOT NULL,
        completed_at            TEXT,
        actual_duration_minutes INTEGER
    )",
    "CREATE TABLE IF NOT EXISTS meditation_achievements (
        user_id        TEXT NOT NULL REFERENCES users(id),
        achievement_id TEXT NOT NULL,
        unlocked_at    TEXT NOT NULL,
        PRIMARY KEY (user_id, achievement_id)
    )",
    "CREATE TABLE IF NOT EXISTS activities (
        id               TEXT PRIMARY KEY,
        title            TEXT NOT NULL,
        description      TEXT NOT NULL,
        category         TEXT NOT NULL,
        mood_tag         TEXT NOT NULL,
        duration_minutes INTEGER NOT NULL,
        difficulty       TEXT NOT NULL,
        resources_needed TEXT
    )",
    "CREATE TABLE IF NOT EXISTS activity_runs (
        id                   TEXT PRIMARY KEY,
        user_id              TEXT NOT NULL REFERENCES users(id),
        activity_id          TEXT NOT NULL REFERENCES activities(id),
        mood_before          INTEGER NOT NULL,
        mood_after           INTEGER,
        feedback             TEXT,
        effectiveness_rating INTEGER,
        started_at           TEXT NOT NULL,
        completed_at         TEXT
    )",
    "CREATE TABLE IF NOT EXISTS coin_balances (
        user_id    TEXT PRIMARY KEY,
        balance    INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS coin_transactions (
        id          TEXT PRIMARY KEY,
        user_id     TEXT NOT NULL,
        amount      INTEGER NOT NULL,
        kind        TEXT NOT NULL,
        source      TEXT NOT NULL,
        description TEXT,
        created_at  TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_activity_runs_user ON activity_runs(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_meditation_user ON meditation_sessions(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_coin_tx_user ON coin_transactions(user_id, created_at)",
];

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        Self::new_with_slow_query(data_dir, 0).await
    }

    /// Create storage with slow-query logging enabled.
    ///
    /// `slow_query_ms` is the threshold in milliseconds — queries exceeding it
    /// are logged at WARN level. Set to 0 to disable slow-query logging.
    pub async fn new_with_slow_query(data_dir: &Path, slow_query_ms: u64) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("smiled.db");
        let mut opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        if slow_query_ms > 0 {
            opts = opts.log_slow_statements(
                log::LevelFilter::Warn,
                std::time::Duration::from_millis(slow_query_ms),
            );
        }

        let pool = SqlitePool::connect_with(opts).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Return a clone of the connection pool (cheap — Arc-backed).
    /// The per-domain storage layers all share this pool.
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        for stmt in SCHEMA {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .with_context(|| format!("schema bootstrap failed: {}", &stmt[..40.min(stmt.len())]))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_bootstrap_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let s1 = Storage::new(dir.path()).await.unwrap();
        drop(s1);
        // Re-opening the same directory runs the bootstrap again.
        let s2 = Storage::new(dir.path()).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&s2.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
