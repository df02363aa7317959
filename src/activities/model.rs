use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// The mood tag this activity targets.
    pub mood_tag: String,
    pub duration_minutes: i64,
    /// "easy" | "medium" | "hard"
    pub difficulty: String,
    pub resources_needed: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityRunRow {
    pub id: String,
    pub user_id: String,
    pub activity_id: String,
    pub mood_before: i64,
    pub mood_after: Option<i64>,
    pub feedback: Option<String>,
    pub effectiveness_rating: Option<i64>,
    pub started_at: String,
    pub completed_at: Option<String>,
}

impl ActivityRunRow {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Mood delta for a completed run.
    pub fn mood_improvement(&self) -> Option<i64> {
        self.mood_after.map(|after| after - self.mood_before)
    }
}

/// Mood scores are self-reported on a 1 to 10 scale.
pub fn valid_mood(score: i64) -> bool {
    (1..=10).contains(&score)
}
