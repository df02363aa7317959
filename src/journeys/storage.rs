//! Journey SQLite operations: the seeded path catalogue, per-user journey
//! progress, and once-only milestone completion.

use anyhow::{Context as _, Result};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::coins::CoinLedger;

use super::model::{
    new_id, JourneyPathRow, JourneyProgressRow, MilestoneProgressRow, MilestoneRow,
};

/// Seed milestones for the default path:
/// (order, title, description, kind, coins, required_activities,
///  reflection_prompt, activity_type, connection_requirement).
type MilestoneSeed = (
    i64,
    &'static str,
    &'static str,
    &'static str,
    i64,
    i64,
    Option<&'static str>,
    Option<&'static str>,
    Option<&'static str>,
);

const GRADE_STRESS_MILESTONES: &[MilestoneSeed] = &[
    (
        1,
        "Start Your Journey",
        "Complete the initial stress assessment and set your academic goals",
        "reflection",
        50,
        1,
        Some("What specific academic situations cause you the most stress?"),
        None,
        None,
    ),
    (
        2,
        "Study Break Master",
        "Learn and practice the Pomodoro Technique for 3 study sessions",
        "activity",
        75,
        3,
        None,
        Some("study_technique"),
        None,
    ),
    (
        3,
        "Mindful Student",
        "Complete 5 mindfulness exercises before study sessions",
        "activity",
        100,
        5,
        None,
        Some("mindfulness"),
        None,
    ),
    (
        4,
        "Study Buddy Connection",
        "Connect with 2 peers from your community for study sessions",
        "connection",
        150,
        2,
        None,
        None,
        Some("study_partner"),
    ),
    (
        5,
        "Progress Reflection",
        "Reflect on your study habits and stress management progress",
        "reflection",
        100,
        1,
        Some("How have your study habits and stress levels changed?"),
        None,
        None,
    ),
    (
        6,
        "Stress-Free Study Group",
        "Create or join a study group and complete 3 group sessions",
        "connection",
        200,
        3,
        None,
        None,
        Some("study_group"),
    ),
    (
        7,
        "Academic Balance Master",
        "Complete the journey by maintaining a study-life balance for a week",
        "activity",
        300,
        7,
        None,
        Some("balance"),
        None,
    ),
];

pub struct JourneyStorage {
    pool: SqlitePool,
}

impl JourneyStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the grade-stress relief path on first start. No-op when any
    /// path already exists.
    pub async fn seed_default_path(&self) -> Result<()> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM journey_paths")
            .fetch_one(&self.pool)
            .await
            .context("count journey paths")?;
        if existing > 0 {
            return Ok(());
        }

        let path_id = new_id();
        sqlx::query(
            "INSERT INTO journey_paths (id, name, description, total_milestones, coins_per_milestone)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&path_id)
        .bind("Grade Stress Relief Journey")
        .bind("A step-by-step journey to manage academic stress and improve your grades")
        .bind(GRADE_STRESS_MILESTONES.len() as i64)
        .bind(50i64)
        .execute(&self.pool)
        .await
        .context("seed journey path")?;

        for (order, title, description, kind, coins, required, prompt, activity, connection) in
            GRADE_STRESS_MILESTONES
        {
            sqlx::query(
                "INSERT INTO milestones
                 (id, path_id, order_number, title, description, kind, coins_reward,
                  required_activities, reflection_prompt, activity_type, connection_requirement)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(new_id())
            .bind(&path_id)
            .bind(order)
            .bind(title)
            .bind(description)
            .bind(kind)
            .bind(coins)
            .bind(required)
            .bind(prompt)
            .bind(activity)
            .bind(connection)
            .execute(&self.pool)
            .await
            .context("seed milestone")?;
        }

        Ok(())
    }

    // ─── Paths & milestones ───────────────────────────────────────────────

    pub async fn list_paths(&self) -> Result<Vec<JourneyPathRow>> {
        Ok(sqlx::query_as("SELECT * FROM journey_paths ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_path(&self, id: &str) -> Result<Option<JourneyPathRow>> {
        Ok(sqlx::query_as("SELECT * FROM journey_paths WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_milestones(&self, path_id: &str) -> Result<Vec<MilestoneRow>> {
        Ok(sqlx::query_as(
            "SELECT * FROM milestones WHERE path_id = ? ORDER BY order_number ASC",
        )
        .bind(path_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn get_milestone(&self, id: &str) -> Result<Option<MilestoneRow>> {
        Ok(sqlx::query_as("SELECT * FROM milestones WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // ─── Journey progress ─────────────────────────────────────────────────

    pub async fn get_progress(
        &self,
        user_id: &str,
        path_id: &str,
    ) -> Result<Option<JourneyProgressRow>> {
        Ok(sqlx::query_as(
            "SELECT * FROM journey_progress WHERE user_id = ? AND path_id = ?",
        )
        .bind(user_id)
        .bind(path_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn list_progress(&self, user_id: &str) -> Result<Vec<JourneyProgressRow>> {
        Ok(sqlx::query_as(
            "SELECT * FROM journey_progress WHERE user_id = ? ORDER BY started_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Start a journey. Returns `(progress, created)` — `created` is false
    /// when the user had already started this path.
    pub async fn start_journey(
        &self,
        user_id: &str,
        path_id: &str,
    ) -> Result<(JourneyProgressRow, bool)> {
        if let Some(existing) = self.get_progress(user_id, path_id).await? {
            return Ok((existing, false));
        }

        let id = new_id();
        sqlx::query(
            "INSERT INTO journey_progress (id, user_id, path_id, started_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(path_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("start journey")?;

        let progress = self
            .get_progress(user_id, path_id)
            .await?
            .context("journey progress vanished after insert")?;
        Ok((progress, true))
    }

    // ─── Milestone completion ─────────────────────────────────────────────

    /// Mark a milestone completed, advance the journey counters, and credit
    /// the coin reward — all in one transaction, so a failed credit rolls the
    /// completed flag back too.
    ///
    /// Returns the new coin balance, or `None` if this (user, milestone) pair
    /// was already completed — the UNIQUE constraint plus `INSERT OR IGNORE`
    /// makes the completion and its credit happen exactly once.
    pub async fn complete_milestone(
        &self,
        user_id: &str,
        milestone: &MilestoneRow,
    ) -> Result<Option<i64>> {
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await.context("begin milestone completion")?;

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO milestone_progress
             (id, user_id, milestone_id, completed, completed_at, coins_earned)
             VALUES (?, ?, ?, 1, ?, ?)",
        )
        .bind(new_id())
        .bind(user_id)
        .bind(&milestone.id)
        .bind(&now)
        .bind(milestone.coins_reward)
        .execute(&mut *tx)
        .await
        .context("record milestone completion")?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await.ok();
            return Ok(None);
        }

        sqlx::query(
            "UPDATE journey_progress SET
                completed_milestones = completed_milestones + 1,
                current_milestone = current_milestone + 1,
                total_coins_earned = total_coins_earned + ?
             WHERE user_id = ? AND path_id = ?",
        )
        .bind(milestone.coins_reward)
        .bind(user_id)
        .bind(&milestone.path_id)
        .execute(&mut *tx)
        .await
        .context("advance journey progress")?;

        let balance = CoinLedger::credit_in_tx(
            &mut tx,
            user_id,
            milestone.coins_reward,
            "milestone",
            &format!("Completed milestone: {}", milestone.title),
        )
        .await?;

        tx.commit().await.context("commit milestone completion")?;
        Ok(Some(balance))
    }

    pub async fn milestone_progress(
        &self,
        user_id: &str,
        milestone_id: &str,
    ) -> Result<Option<MilestoneProgressRow>> {
        Ok(sqlx::query_as(
            "SELECT * FROM milestone_progress WHERE user_id = ? AND milestone_id = ?",
        )
        .bind(user_id)
        .bind(milestone_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Completed milestones for a user, newest first — the stats timeline.
    pub async fn completed_timeline(
        &self,
        user_id: &str,
    ) -> Result<Vec<(String, String, i64)>> {
        Ok(sqlx::query_as(
            "SELECT m.title, mp.completed_at, mp.coins_earned
               FROM milestone_progress mp
               JOIN milestones m ON m.id = mp.milestone_id
              WHERE mp.user_id = ? AND mp.completed = 1
           ORDER BY mp.completed_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Count of distinct calendar days with at least one milestone completion.
    pub async fn active_days(&self, user_id: &str) -> Result<i64> {
        Ok(sqlx::query_scalar(
            "SELECT COUNT(DISTINCT date(completed_at)) FROM milestone_progress
              WHERE user_id = ? AND completed = 1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }
}
