//! HTTP handlers for journey paths, milestone completion, and journey stats.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::streaks::StreakDomain;
use crate::AppContext;

use super::model::MilestoneSubmission;
use super::validator;

#[derive(Deserialize)]
pub struct ListJourneysQuery {
    pub user_id: Option<String>,
}

/// GET /api/v1/journeys — every path with its milestones; when `user_id` is
/// given, each path also carries that user's progress.
pub async fn list_journeys(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<ListJourneysQuery>,
) -> ApiResult<Json<Value>> {
    if let Some(user_id) = &query.user_id {
        ctx.users.require(user_id).await?;
    }

    let mut paths = Vec::new();
    for path in ctx.journeys.list_paths().await? {
        let milestones = ctx.journeys.list_milestones(&path.id).await?;
        let progress = match &query.user_id {
            Some(user_id) => ctx.journeys.get_progress(user_id, &path.id).await?,
            None => None,
        };
        paths.push(json!({
            "path": path,
            "milestones": milestones,
            "progress": progress,
        }));
    }

    Ok(Json(json!({ "journeys": paths })))
}

#[derive(Deserialize)]
pub struct StartJourneyRequest {
    pub user_id: String,
}

/// POST /api/v1/journeys/{path_id}/start — 201 on first start, 200 with the
/// existing progress when the user already started this path.
pub async fn start_journey(
    State(ctx): State<Arc<AppContext>>,
    Path(path_id): Path<String>,
    Json(body): Json<StartJourneyRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.users.require(&body.user_id).await?;
    let path = ctx
        .journeys
        .get_path(&path_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Journey path not found"))?;

    let (progress, created) = ctx.journeys.start_journey(&body.user_id, &path_id).await?;
    if created {
        info!(user_id = %body.user_id, path = %path.name, "journey started");
        Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Journey started", "progress": progress })),
        ))
    } else {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Journey already started", "progress": progress })),
        ))
    }
}

#[derive(Deserialize)]
pub struct CompleteMilestoneRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub submission: MilestoneSubmission,
}

/// POST /api/v1/milestones/{id}/complete
///
/// Milestones complete in order, one at a time. A valid submission credits
/// the coin reward exactly once and folds the completion into the journey
/// streak.
pub async fn complete_milestone(
    State(ctx): State<Arc<AppContext>>,
    Path(milestone_id): Path<String>,
    Json(body): Json<CompleteMilestoneRequest>,
) -> ApiResult<Json<Value>> {
    let milestone = ctx
        .journeys
        .get_milestone(&milestone_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Milestone not found"))?;
    ctx.users.require(&body.user_id).await?;

    let progress = ctx
        .journeys
        .get_progress(&body.user_id, &milestone.path_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("Journey not started"))?;

    // current_milestone is the next expected order number (1-based).
    if milestone.order_number != progress.current_milestone {
        return Err(ApiError::bad_request("Cannot skip milestones"));
    }

    let verdict = validator::validate(
        &milestone,
        &body.submission,
        ctx.config.progress.reflection_min_words,
    );
    if !verdict.valid {
        return Err(ApiError::bad_request(verdict.message));
    }

    // The completed flag and the coin credit commit in one transaction.
    let balance = ctx
        .journeys
        .complete_milestone(&body.user_id, &milestone)
        .await?
        .ok_or_else(|| ApiError::bad_request("Milestone already completed"))?;

    let streak = ctx
        .streaks
        .record_activity(&body.user_id, StreakDomain::Journey, Utc::now().date_naive())
        .await?;

    info!(
        user_id = %body.user_id,
        milestone = %milestone.title,
        coins = milestone.coins_reward,
        "milestone completed"
    );

    Ok(Json(json!({
        "message": verdict.message,
        "milestone": milestone.title,
        "coins_earned": milestone.coins_reward,
        "balance": balance,
        "current_streak": streak.current_streak,
        "longest_streak": streak.longest_streak,
    })))
}

/// GET /api/v1/users/{id}/journeys — progress rows across all started paths.
pub async fn user_journeys(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    ctx.users.require(&user_id).await?;

    let mut journeys = Vec::new();
    for progress in ctx.journeys.list_progress(&user_id).await? {
        let path = ctx.journeys.get_path(&progress.path_id).await?;
        journeys.push(json!({ "path": path, "progress": progress }));
    }

    Ok(Json(json!({ "journeys": journeys })))
}

/// GET /api/v1/users/{id}/journeys/stats
pub async fn journey_stats(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    ctx.users.require(&user_id).await?;

    let progress = ctx.journeys.list_progress(&user_id).await?;
    let streak = ctx.streaks.get(&user_id, StreakDomain::Journey).await?;
    let active_days = ctx.journeys.active_days(&user_id).await?;
    let timeline = ctx.journeys.completed_timeline(&user_id).await?;

    let total_coins: i64 = progress.iter().map(|p| p.total_coins_earned).sum();
    let total_milestones: i64 = progress.iter().map(|p| p.completed_milestones).sum();

    let mut per_path = Vec::new();
    for p in &progress {
        let path = ctx.journeys.get_path(&p.path_id).await?;
        let total = path.as_ref().map_or(0, |path| path.total_milestones);
        let percent = if total > 0 {
            (p.completed_milestones as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        per_path.push(json!({
            "path": path.map(|path| path.name),
            "completed_milestones": p.completed_milestones,
            "total_milestones": total,
            "completion_percent": percent,
        }));
    }

    let recent: Vec<Value> = timeline
        .into_iter()
        .map(|(title, completed_at, coins)| {
            json!({ "title": title, "completed_at": completed_at, "coins_earned": coins })
        })
        .collect();

    Ok(Json(json!({
        "total_coins_earned": total_coins,
        "total_milestones_completed": total_milestones,
        "active_journeys": progress.len(),
        "active_days": active_days,
        "current_streak": streak.current_streak,
        "longest_streak": streak.longest_streak,
        "per_path": per_path,
        "recent_completions": recent,
    })))
}
