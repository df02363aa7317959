//! HTTP handlers for activity recommendations, runs, stats, and insights.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::stats::{build_stats, CompletedRecord};
use crate::streaks::StreakDomain;
use crate::AppContext;

use super::model::{valid_mood, ActivityRunRow};

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

/// GET /api/v1/users/{id}/activities/recommended — catalogue entries for the
/// user's mood tag, not-yet-completed activities first.
pub async fn recommended(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let user = ctx.users.require(&user_id).await?;
    let Some(mood_tag) = user.mood_tag else {
        return Err(ApiError::bad_request(
            "Set a mood profile first to get recommendations",
        ));
    };

    let activities = ctx.activities.recommended_for(&user_id, &mood_tag).await?;
    Ok(Json(json!({ "mood_tag": mood_tag, "activities": activities })))
}

#[derive(Deserialize)]
pub struct StartRunRequest {
    pub user_id: String,
    pub mood_before: i64,
}

/// POST /api/v1/activities/{id}/start
pub async fn start_run(
    State(ctx): State<Arc<AppContext>>,
    Path(activity_id): Path<String>,
    Json(body): Json<StartRunRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.users.require(&body.user_id).await?;
    let activity = ctx
        .activities
        .get_activity(&activity_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Activity not found"))?;

    if !valid_mood(body.mood_before) {
        return Err(ApiError::bad_request("mood_before must be between 1 and 10"));
    }

    let run = ctx
        .activities
        .start_run(&body.user_id, &activity_id, body.mood_before)
        .await?;
    info!(user_id = %body.user_id, activity = %activity.title, "activity run started");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "run": run, "activity": activity })),
    ))
}

#[derive(Deserialize)]
pub struct CompleteRunRequest {
    pub user_id: String,
    pub mood_after: i64,
    pub feedback: Option<String>,
    pub effectiveness_rating: Option<i64>,
}

/// POST /api/v1/activities/runs/{run_id}/complete
///
/// A run belonging to another user reads as not found.
pub async fn complete_run(
    State(ctx): State<Arc<AppContext>>,
    Path(run_id): Path<String>,
    Json(body): Json<CompleteRunRequest>,
) -> ApiResult<Json<Value>> {
    let run = require_own_run(&ctx, &run_id, &body.user_id).await?;

    if run.is_completed() {
        return Err(ApiError::bad_request("Activity already completed"));
    }
    if !valid_mood(body.mood_after) {
        return Err(ApiError::bad_request("mood_after must be between 1 and 10"));
    }
    if let Some(rating) = body.effectiveness_rating {
        if !(1..=5).contains(&rating) {
            return Err(ApiError::bad_request(
                "effectiveness_rating must be between 1 and 5",
            ));
        }
    }

    let run = ctx
        .activities
        .complete_run(
            &run_id,
            body.mood_after,
            body.feedback.as_deref(),
            body.effectiveness_rating,
        )
        .await?;

    let streak = ctx
        .streaks
        .record_activity(&body.user_id, StreakDomain::Activity, Utc::now().date_naive())
        .await?;

    info!(
        user_id = %body.user_id,
        improvement = run.mood_improvement(),
        "activity run completed"
    );

    Ok(Json(json!({
        "message": "Activity completed successfully",
        "mood_improvement": run.mood_improvement(),
        "current_streak": streak.current_streak,
        "total_completed": streak.total_completed,
    })))
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub user_id: String,
    pub feedback: Option<String>,
    pub effectiveness_rating: Option<i64>,
}

/// PATCH /api/v1/activities/runs/{run_id}/feedback — feedback fields are the
/// only mutation allowed after completion.
pub async fn update_feedback(
    State(ctx): State<Arc<AppContext>>,
    Path(run_id): Path<String>,
    Json(body): Json<FeedbackRequest>,
) -> ApiResult<Json<Value>> {
    let run = require_own_run(&ctx, &run_id, &body.user_id).await?;

    if !run.is_completed() {
        return Err(ApiError::bad_request("Complete the activity first"));
    }
    if let Some(rating) = body.effectiveness_rating {
        if !(1..=5).contains(&rating) {
            return Err(ApiError::bad_request(
                "effectiveness_rating must be between 1 and 5",
            ));
        }
    }

    let run = ctx
        .activities
        .update_feedback(&run_id, body.feedback.as_deref(), body.effectiveness_rating)
        .await?;
    Ok(Json(json!({ "run": run })))
}

/// GET /api/v1/users/{id}/activities/stats
pub async fn activity_stats(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    ctx.users.require(&user_id).await?;

    let streak = ctx.streaks.get(&user_id, StreakDomain::Activity).await?;
    let completed = ctx.activities.completed_runs(&user_id).await?;

    let improvements: Vec<i64> = completed
        .iter()
        .filter_map(|(run, _, _)| run.mood_improvement())
        .collect();
    let average_improvement = if improvements.is_empty() {
        0.0
    } else {
        improvements.iter().sum::<i64>() as f64 / improvements.len() as f64
    };
    let improved = improvements.iter().filter(|i| **i > 0).count();

    // Top runs by effectiveness rating; unrated runs sort last.
    let mut by_rating: Vec<&(ActivityRunRow, String, String)> = completed.iter().collect();
    by_rating.sort_by_key(|(run, _, _)| std::cmp::Reverse(run.effectiveness_rating.unwrap_or(0)));
    let most_effective: Vec<Value> = by_rating
        .iter()
        .take(3)
        .map(|(run, title, _)| {
            json!({
                "activity_name": title,
                "effectiveness_rating": run.effectiveness_rating,
                "mood_improvement": run.mood_improvement(),
            })
        })
        .collect();

    Ok(Json(json!({
        "streak_stats": {
            "current_streak": streak.current_streak,
            "longest_streak": streak.longest_streak,
            "total_completed": streak.total_completed,
        },
        "mood_stats": {
            "average_improvement": average_improvement,
            "activities_with_improvement": improved,
        },
        "most_effective_activities": most_effective,
    })))
}

/// GET /api/v1/users/{id}/activities/insights — the aggregate statistics
/// builder over completed runs, plus a recommendation line.
pub async fn activity_insights(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    ctx.users.require(&user_id).await?;

    let completed = ctx.activities.completed_runs(&user_id).await?;
    let records: Vec<CompletedRecord> = completed
        .iter()
        .filter_map(|(run, _, category)| {
            run.mood_improvement().map(|improvement| CompletedRecord {
                category: category.clone(),
                improvement,
            })
        })
        .collect();

    let stats = build_stats(&records);
    let recommendation = match &stats.best_category {
        Some(category) => {
            format!("Activities in the {category} category seem to work best for you")
        }
        None => "Try your first activity to start tracking your progress".to_string(),
    };

    Ok(Json(json!({
        "stats": stats,
        "recommendation": recommendation,
    })))
}

async fn require_own_run(
    ctx: &AppContext,
    run_id: &str,
    user_id: &str,
) -> Result<ActivityRunRow, ApiError> {
    let run = ctx
        .activities
        .get_run(run_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Activity not found"))?;
    if run.user_id != user_id {
        return Err(ApiError::not_found("Activity not found"));
    }
    Ok(run)
}
