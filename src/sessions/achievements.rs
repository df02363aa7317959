//! Meditation achievements — session-count badges plus the 7-day streak
//! badge, unlocked once per user.
//!
//! Achievement IDs use snake_case as their string value (e.g.
//! `"meditation_beginner"`). They are stable across server versions.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use super::storage::MeditationStorage;

// ─── Achievement ID constants ─────────────────────────────────────────────────

pub const MEDITATION_BEGINNER: &str = "meditation_beginner";
pub const REGULAR_MEDITATOR: &str = "regular_meditator";
pub const MEDITATION_ENTHUSIAST: &str = "meditation_enthusiast";
pub const MEDITATION_MASTER: &str = "meditation_master";
pub const WEEK_OF_ZEN: &str = "week_of_zen";

/// Completed-session counts at which the session badges unlock.
const SESSION_BADGES: &[(u64, &str)] = &[
    (5, MEDITATION_BEGINNER),
    (20, REGULAR_MEDITATOR),
    (50, MEDITATION_ENTHUSIAST),
    (100, MEDITATION_MASTER),
];

/// Days of unbroken meditation that earn the streak badge.
const STREAK_BADGE_DAYS: u32 = 7;

/// A badge a user has just earned, as it appears in the completion response.
#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: String,
    /// "meditation" for session-count badges, "streak" for the streak badge.
    pub kind: String,
    pub title: String,
    pub description: String,
    pub unlocked_at: String,
}

/// All defined achievements as `(id, kind, title, description)` tuples.
/// The canonical badge catalogue.
pub fn all_definitions() -> Vec<(&'static str, &'static str, &'static str, &'static str)> {
    vec![
        (
            MEDITATION_BEGINNER,
            "meditation",
            "Meditation Beginner",
            "Completed 5 meditation sessions!",
        ),
        (
            REGULAR_MEDITATOR,
            "meditation",
            "Regular Meditator",
            "Completed 20 meditation sessions!",
        ),
        (
            MEDITATION_ENTHUSIAST,
            "meditation",
            "Meditation Enthusiast",
            "Completed 50 meditation sessions!",
        ),
        (
            MEDITATION_MASTER,
            "meditation",
            "Meditation Master",
            "Completed 100 meditation sessions!",
        ),
        (
            WEEK_OF_ZEN,
            "streak",
            "Week of Zen",
            "Maintained a 7-day meditation streak!",
        ),
    ]
}

/// Badge IDs whose conditions are met by the given totals. Unlock state is
/// not consulted here — `check_and_unlock` filters to the newly earned.
pub fn candidates_for(completed_sessions: u64, current_streak: u32) -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = SESSION_BADGES
        .iter()
        .filter(|(threshold, _)| completed_sessions >= *threshold)
        .map(|(_, id)| *id)
        .collect();
    if current_streak >= STREAK_BADGE_DAYS {
        ids.push(WEEK_OF_ZEN);
    }
    ids
}

/// Evaluate the user's totals against the badge conditions, unlock any newly
/// met badges, and return them so the completion response can announce them.
/// Already-unlocked badges are never returned twice.
pub async fn check_and_unlock(
    storage: &MeditationStorage,
    user_id: &str,
    completed_sessions: u64,
    current_streak: u32,
) -> Result<Vec<Achievement>> {
    let defs: std::collections::HashMap<&str, (&str, &str, &str)> = all_definitions()
        .into_iter()
        .map(|(id, kind, title, desc)| (id, (kind, title, desc)))
        .collect();

    let mut newly_unlocked = Vec::new();
    for id in candidates_for(completed_sessions, current_streak) {
        let is_new = storage.unlock_achievement(user_id, id).await?;
        if is_new {
            let (kind, title, description) = defs.get(id).copied().unwrap_or(("", "Unknown", ""));
            newly_unlocked.push(Achievement {
                id: id.to_string(),
                kind: kind.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                unlocked_at: Utc::now().to_rfc3339(),
            });
        }
    }

    Ok(newly_unlocked)
}
