//! Meditation session persistence.

use anyhow::{Context as _, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::model::MeditationSessionRow;

pub struct MeditationStorage {
    pool: SqlitePool,
}

impl MeditationStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_session(
        &self,
        user_id: &str,
        duration_minutes: u32,
        ambient_sound: Option<&str>,
    ) -> Result<MeditationSessionRow> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO meditation_sessions
             (id, user_id, duration_minutes, ambient_sound, status, started_at)
             VALUES (?, ?, ?, ?, 'in_progress', ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(duration_minutes as i64)
        .bind(ambient_sound)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("create meditation session")?;

        self.get_session(&id)
            .await?
            .context("meditation session vanished after insert")
    }

    pub async fn get_session(&self, id: &str) -> Result<Option<MeditationSessionRow>> {
        Ok(sqlx::query_as("SELECT * FROM meditation_sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Mark a session completed with the minutes actually meditated.
    pub async fn complete_session(
        &self,
        id: &str,
        actual_duration_minutes: u32,
    ) -> Result<MeditationSessionRow> {
        sqlx::query(
            "UPDATE meditation_sessions SET
                status = 'completed',
                completed_at = ?,
                actual_duration_minutes = ?
             WHERE id = ?",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(actual_duration_minutes as i64)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("complete meditation session")?;

        self.get_session(id)
            .await?
            .context("meditation session vanished after update")
    }

    /// Record a badge unlock. Returns true only the first time this
    /// (user, badge) pair is seen.
    pub async fn unlock_achievement(&self, user_id: &str, achievement_id: &str) -> Result<bool> {
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO meditation_achievements (user_id, achievement_id, unlocked_at)
             VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(achievement_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("unlock meditation achievement")?
        .rows_affected();
        Ok(inserted > 0)
    }

    /// Full session history for a user, oldest first.
    pub async fn list_sessions(&self, user_id: &str) -> Result<Vec<MeditationSessionRow>> {
        Ok(sqlx::query_as(
            "SELECT * FROM meditation_sessions WHERE user_id = ? ORDER BY started_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
