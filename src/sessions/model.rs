use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MeditationSessionRow {
    pub id: String,
    pub user_id: String,
    pub duration_minutes: i64,
    pub ambient_sound: Option<String>,
    /// "in_progress" | "completed"
    pub status: String,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub actual_duration_minutes: Option<i64>,
}

impl MeditationSessionRow {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// Aggregates over a user's completed sessions, all zero when the user has
/// never meditated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeditationTotals {
    pub total_sessions: u64,
    pub completed_sessions: u64,
    pub total_minutes: u64,
    pub average_duration_minutes: f64,
    pub favorite_duration_minutes: Option<u32>,
    pub completion_rate: f64,
}

/// Fold a user's session history into totals. Minutes count the actual
/// duration of completed sessions; the favorite duration is the most common
/// planned duration among completed sessions, earliest-seen on ties.
pub fn compute_totals(sessions: &[MeditationSessionRow]) -> MeditationTotals {
    let total_sessions = sessions.len() as u64;
    let completed: Vec<&MeditationSessionRow> =
        sessions.iter().filter(|s| s.is_completed()).collect();

    if completed.is_empty() {
        return MeditationTotals {
            total_sessions,
            ..MeditationTotals::default()
        };
    }

    let total_minutes: u64 = completed
        .iter()
        .map(|s| s.actual_duration_minutes.unwrap_or(s.duration_minutes).max(0) as u64)
        .sum();

    let mut duration_counts: Vec<(i64, u64)> = Vec::new();
    for s in &completed {
        match duration_counts.iter_mut().find(|(d, _)| *d == s.duration_minutes) {
            Some((_, n)) => *n += 1,
            None => duration_counts.push((s.duration_minutes, 1)),
        }
    }
    let favorite = duration_counts
        .iter()
        .fold(None::<(i64, u64)>, |best, &(d, n)| match best {
            Some((_, best_n)) if n <= best_n => best,
            _ => Some((d, n)),
        })
        .map(|(d, _)| d as u32);

    MeditationTotals {
        total_sessions,
        completed_sessions: completed.len() as u64,
        total_minutes,
        average_duration_minutes: total_minutes as f64 / completed.len() as f64,
        favorite_duration_minutes: favorite,
        completion_rate: completed.len() as f64 / total_sessions as f64,
    }
}

/// The time of day the user most often starts sessions: 05:00–11:59 is
/// "morning", 12:00–17:59 "afternoon", everything else "evening". Ties go
/// to the earliest bucket in the day, the same first-seen rule as the
/// favorite duration. Unparseable timestamps are skipped.
pub fn preferred_time_of_day(sessions: &[&MeditationSessionRow]) -> &'static str {
    let mut buckets = [0u32; 3]; // morning, afternoon, evening
    for s in sessions {
        if let Ok(started) = s.started_at.parse::<DateTime<Utc>>() {
            match started.hour() {
                5..=11 => buckets[0] += 1,
                12..=17 => buckets[1] += 1,
                _ => buckets[2] += 1,
            }
        }
    }
    let best = (0..buckets.len()).fold(0, |best, i| {
        if buckets[i] > buckets[best] {
            i
        } else {
            best
        }
    });
    ["morning", "afternoon", "evening"][best]
}
