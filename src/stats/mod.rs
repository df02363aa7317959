//! Aggregate engagement statistics — a pure fold over completed records.
//!
//! Consumed by the activity insights endpoint and the journey stats view.

use serde::{Deserialize, Serialize};

/// One completed unit of engagement with a before/after mood reading.
#[derive(Debug, Clone)]
pub struct CompletedRecord {
    pub category: String,
    /// Mood delta for this record: mood after minus mood before.
    pub improvement: i64,
}

/// Per-category rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub completed: u64,
    pub average_improvement: f64,
}

/// Totals and the most effective category across a user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementStats {
    pub total_completed: u64,
    pub average_improvement: f64,
    /// Category with the highest average improvement. Ties are broken by
    /// first-seen order in the input. `None` when there are no records.
    pub best_category: Option<String>,
    pub per_category: Vec<CategorySummary>,
}

impl EngagementStats {
    pub fn empty() -> Self {
        Self {
            total_completed: 0,
            average_improvement: 0.0,
            best_category: None,
            per_category: Vec::new(),
        }
    }
}

/// Fold completed records into totals, a global average improvement, and
/// per-category averages. Returns zeroed defaults for an empty input.
pub fn build_stats(records: &[CompletedRecord]) -> EngagementStats {
    if records.is_empty() {
        return EngagementStats::empty();
    }

    let mut total_improvement: i64 = 0;
    // Vec keyed by category, in first-seen order — the tie-break contract.
    let mut categories: Vec<(String, i64, u64)> = Vec::new();

    for record in records {
        total_improvement += record.improvement;
        match categories.iter_mut().find(|(c, _, _)| *c == record.category) {
            Some((_, sum, count)) => {
                *sum += record.improvement;
                *count += 1;
            }
            None => categories.push((record.category.clone(), record.improvement, 1)),
        }
    }

    let per_category: Vec<CategorySummary> = categories
        .into_iter()
        .map(|(category, sum, count)| CategorySummary {
            category,
            completed: count,
            average_improvement: sum as f64 / count as f64,
        })
        .collect();

    // Strictly-greater comparison keeps the first-seen category on ties.
    let best_category = per_category
        .iter()
        .fold(None::<&CategorySummary>, |best, cand| match best {
            Some(b) if cand.average_improvement > b.average_improvement => Some(cand),
            Some(b) => Some(b),
            None => Some(cand),
        })
        .map(|c| c.category.clone());

    EngagementStats {
        total_completed: records.len() as u64,
        average_improvement: total_improvement as f64 / records.len() as f64,
        best_category,
        per_category,
    }
}
