//! Activity catalogue and run persistence.

use anyhow::{Context as _, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::catalog::DEFAULT_ACTIVITIES;
use super::model::{ActivityRow, ActivityRunRow};

pub struct ActivityStorage {
    pool: SqlitePool,
}

impl ActivityStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Seed the built-in catalogue on first start. No-op when any activity
    /// already exists.
    pub async fn seed_catalog(&self) -> Result<()> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activities")
            .fetch_one(&self.pool)
            .await
            .context("count activities")?;
        if existing > 0 {
            return Ok(());
        }

        for (mood, title, description, category, duration, difficulty, resources) in
            DEFAULT_ACTIVITIES
        {
            sqlx::query(
                "INSERT INTO activities
                 (id, title, description, category, mood_tag, duration_minutes, difficulty, resources_needed)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(title)
            .bind(description)
            .bind(category)
            .bind(mood)
            .bind(duration)
            .bind(difficulty)
            .bind(resources)
            .execute(&self.pool)
            .await
            .context("seed activity")?;
        }

        Ok(())
    }

    pub async fn get_activity(&self, id: &str) -> Result<Option<ActivityRow>> {
        Ok(sqlx::query_as("SELECT * FROM activities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Catalogue entries for a mood tag, activities the user has not yet
    /// completed first.
    pub async fn recommended_for(
        &self,
        user_id: &str,
        mood_tag: &str,
    ) -> Result<Vec<ActivityRow>> {
        Ok(sqlx::query_as(
            "SELECT a.* FROM activities a
              WHERE a.mood_tag = ?
           ORDER BY EXISTS (
                        SELECT 1 FROM activity_runs r
                         WHERE r.activity_id = a.id
                           AND r.user_id = ?
                           AND r.completed_at IS NOT NULL
                    ) ASC,
                    a.title ASC",
        )
        .bind(mood_tag)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn start_run(
        &self,
        user_id: &str,
        activity_id: &str,
        mood_before: i64,
    ) -> Result<ActivityRunRow> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO activity_runs (id, user_id, activity_id, mood_before, started_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(activity_id)
        .bind(mood_before)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("start activity run")?;

        self.get_run(&id)
            .await?
            .context("activity run vanished after insert")
    }

    pub async fn get_run(&self, id: &str) -> Result<Option<ActivityRunRow>> {
        Ok(sqlx::query_as("SELECT * FROM activity_runs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn complete_run(
        &self,
        id: &str,
        mood_after: i64,
        feedback: Option<&str>,
        effectiveness_rating: Option<i64>,
    ) -> Result<ActivityRunRow> {
        sqlx::query(
            "UPDATE activity_runs SET
                completed_at = ?,
                mood_after = ?,
                feedback = ?,
                effectiveness_rating = ?
             WHERE id = ?",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(mood_after)
        .bind(feedback)
        .bind(effectiveness_rating)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("complete activity run")?;

        self.get_run(id)
            .await?
            .context("activity run vanished after update")
    }

    /// Amend feedback fields on a completed run.
    pub async fn update_feedback(
        &self,
        id: &str,
        feedback: Option<&str>,
        effectiveness_rating: Option<i64>,
    ) -> Result<ActivityRunRow> {
        sqlx::query(
            "UPDATE activity_runs SET
                feedback = COALESCE(?, feedback),
                effectiveness_rating = COALESCE(?, effectiveness_rating)
             WHERE id = ?",
        )
        .bind(feedback)
        .bind(effectiveness_rating)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("update run feedback")?;

        self.get_run(id)
            .await?
            .context("activity run vanished after update")
    }

    /// Completed runs joined with their activity's title and category,
    /// newest first.
    pub async fn completed_runs(
        &self,
        user_id: &str,
    ) -> Result<Vec<(ActivityRunRow, String, String)>> {
        let rows: Vec<ActivityRunRow> = sqlx::query_as(
            "SELECT * FROM activity_runs
              WHERE user_id = ? AND completed_at IS NOT NULL
           ORDER BY completed_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut joined = Vec::with_capacity(rows.len());
        for run in rows {
            let (title, category): (String, String) =
                sqlx::query_as("SELECT title, category FROM activities WHERE id = ?")
                    .bind(&run.activity_id)
                    .fetch_one(&self.pool)
                    .await
                    .context("load activity for run")?;
            joined.push((run, title, category));
        }
        Ok(joined)
    }
}
