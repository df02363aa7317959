//! Milestone requirement validation — a single-pass check of the submitted
//! data against the milestone's declared kind and thresholds.

use std::collections::HashSet;

use super::model::{MilestoneKind, MilestoneRow, MilestoneSubmission};

/// Connection types a connection milestone accepts.
pub const CONNECTION_TYPES: [&str; 2] = ["study_partner", "study_group"];

/// Outcome of validating a submission. `message` explains a rejection or
/// confirms acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub message: String,
}

impl Validation {
    fn ok(message: &str) -> Self {
        Self {
            valid: true,
            message: message.to_string(),
        }
    }

    fn reject(message: String) -> Self {
        Self {
            valid: false,
            message,
        }
    }
}

/// Validate `submission` against `milestone`.
///
/// `min_reflection_words` comes from `[progress] reflection_min_words`
/// (default 50). Boundary: a reflection of exactly the threshold is valid.
pub fn validate(
    milestone: &MilestoneRow,
    submission: &MilestoneSubmission,
    min_reflection_words: usize,
) -> Validation {
    let Some(kind) = MilestoneKind::parse(&milestone.kind) else {
        return Validation::reject("Unknown milestone type".to_string());
    };

    match kind {
        MilestoneKind::Reflection => {
            let words = submission
                .content
                .as_deref()
                .map(|c| c.split_whitespace().count())
                .unwrap_or(0);
            if words < min_reflection_words {
                return Validation::reject(format!(
                    "Reflection must be at least {min_reflection_words} words (got {words})"
                ));
            }
            Validation::ok("Valid reflection")
        }
        MilestoneKind::Activity => {
            let done = submission.completed_activities.unwrap_or(0);
            if done < milestone.required_activities {
                return Validation::reject(format!(
                    "Requires {} completed activities (got {done})",
                    milestone.required_activities
                ));
            }
            Validation::ok("Valid activity record")
        }
        MilestoneKind::Connection => {
            let Some(connection_type) = submission.connection_type.as_deref() else {
                return Validation::reject("Missing connection_type".to_string());
            };
            if !CONNECTION_TYPES.contains(&connection_type) {
                return Validation::reject("Invalid connection type".to_string());
            }
            let distinct: HashSet<&str> = submission
                .peer_ids
                .iter()
                .map(String::as_str)
                .filter(|p| !p.is_empty())
                .collect();
            if (distinct.len() as i64) < milestone.required_activities {
                return Validation::reject(format!(
                    "Requires interactions with {} distinct peers (got {})",
                    milestone.required_activities,
                    distinct.len()
                ));
            }
            Validation::ok("Valid connection record")
        }
    }
}
