//! Journey data models — rows and the milestone submission payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// What a milestone asks the user to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneKind {
    /// Free-text reflection with a minimum word count.
    Reflection,
    /// A count of completed sub-activities.
    Activity,
    /// Interactions with distinct peers of a recognised connection type.
    Connection,
}

impl MilestoneKind {
    /// Parse the stored kind string. Unknown kinds return `None` — the
    /// validator treats them as invalid rather than panicking on bad rows.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reflection" => Some(Self::Reflection),
            "activity" => Some(Self::Activity),
            "connection" => Some(Self::Connection),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JourneyPathRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub total_milestones: i64,
    pub coins_per_milestone: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MilestoneRow {
    pub id: String,
    pub path_id: String,
    pub order_number: i64,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub coins_reward: i64,
    pub required_activities: i64,
    pub reflection_prompt: Option<String>,
    pub activity_type: Option<String>,
    pub connection_requirement: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JourneyProgressRow {
    pub id: String,
    pub user_id: String,
    pub path_id: String,
    pub completed_milestones: i64,
    pub current_milestone: i64,
    pub total_coins_earned: i64,
    pub started_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MilestoneProgressRow {
    pub id: String,
    pub user_id: String,
    pub milestone_id: String,
    pub completed: bool,
    pub completed_at: Option<String>,
    pub coins_earned: i64,
}

/// The body of a milestone completion request. Which fields matter depends
/// on the milestone kind; the validator checks the relevant ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MilestoneSubmission {
    /// Reflection text (reflection milestones).
    pub content: Option<String>,
    /// Number of completed sub-activities (activity milestones).
    pub completed_activities: Option<i64>,
    /// Recognised connection type (connection milestones).
    pub connection_type: Option<String>,
    /// Peers interacted with (connection milestones); duplicates collapse.
    #[serde(default)]
    pub peer_ids: Vec<String>,
}
