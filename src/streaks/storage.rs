//! Streak persistence over the shared SQLite pool.

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::{update_streak, StreakDomain, StreakRecord};

pub struct StreakStorage {
    pool: SqlitePool,
}

impl StreakStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load the streak record for (user, domain). A user who has never
    /// recorded an activity gets the zeroed default — current streak 0.
    pub async fn get(&self, user_id: &str, domain: StreakDomain) -> Result<StreakRecord> {
        let row: Option<(i64, i64, Option<String>, i64)> = sqlx::query_as(
            "SELECT current_streak, longest_streak, last_activity_date, total_completed
               FROM streaks WHERE user_id = ? AND domain = ?",
        )
        .bind(user_id)
        .bind(domain.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("load streak record")?;

        Ok(match row {
            None => StreakRecord::default(),
            Some((current, longest, last, total)) => StreakRecord {
                current_streak: current as u32,
                longest_streak: longest as u32,
                last_activity_date: last.and_then(|s| s.parse().ok()),
                total_completed: total as u64,
            },
        })
    }

    /// Fold one completed activity into the stored record and return the
    /// updated state. Upserts the row for first-time users.
    pub async fn record_activity(
        &self,
        user_id: &str,
        domain: StreakDomain,
        activity_date: NaiveDate,
    ) -> Result<StreakRecord> {
        let mut record = self.get(user_id, domain).await?;
        update_streak(&mut record, activity_date);

        sqlx::query(
            "INSERT INTO streaks (user_id, domain, current_streak, longest_streak, last_activity_date, total_completed)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (user_id, domain) DO UPDATE SET
                current_streak = excluded.current_streak,
                longest_streak = excluded.longest_streak,
                last_activity_date = excluded.last_activity_date,
                total_completed = excluded.total_completed",
        )
        .bind(user_id)
        .bind(domain.as_str())
        .bind(record.current_streak as i64)
        .bind(record.longest_streak as i64)
        .bind(record.last_activity_date.map(|d| d.to_string()))
        .bind(record.total_completed as i64)
        .execute(&self.pool)
        .await
        .context("persist streak record")?;

        Ok(record)
    }
}
