//! HTTP handlers for meditation presets, sessions, stats, and
//! recommendations.

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
use crate::streaks::StreakDomain;
use crate::AppContext;

use super::model::{compute_totals, preferred_time_of_day, MeditationSessionRow};
use super::{achievements, AMBIENT_SOUNDS, DURATION_PRESETS};

/// GET /api/v1/meditation/presets
pub async fn presets() -> Json<Value> {
    Json(json!({
        "durations_minutes": DURATION_PRESETS,
        "ambient_sounds": AMBIENT_SOUNDS,
    }))
}

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub user_id: String,
    pub duration_minutes: u32,
    pub ambient_sound: Option<String>,
}

/// POST /api/v1/meditation/sessions
pub async fn create_session(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.users.require(&body.user_id).await?;

    if !DURATION_PRESETS.contains(&body.duration_minutes) {
        return Err(ApiError::bad_request(format!(
            "duration must be one of the presets: {DURATION_PRESETS:?}"
        )));
    }
    if let Some(sound) = body.ambient_sound.as_deref() {
        if !AMBIENT_SOUNDS.contains(&sound) {
            return Err(ApiError::bad_request(format!(
                "unknown ambient sound — expected one of: {}",
                AMBIENT_SOUNDS.join(", ")
            )));
        }
    }

    let session = ctx
        .meditation
        .create_session(
            &body.user_id,
            body.duration_minutes,
            body.ambient_sound.as_deref(),
        )
        .await?;
    info!(user_id = %body.user_id, duration = body.duration_minutes, "meditation session started");
    Ok((StatusCode::CREATED, Json(json!(session))))
}

#[derive(Deserialize)]
pub struct CompleteSessionRequest {
    pub user_id: String,
    /// Minutes actually meditated; defaults to the planned duration.
    pub actual_duration_minutes: Option<u32>,
}

/// POST /api/v1/meditation/sessions/{id}/complete
pub async fn complete_session(
    State(ctx): State<Arc<AppContext>>,
    Path(session_id): Path<String>,
    Json(body): Json<CompleteSessionRequest>,
) -> ApiResult<Json<Value>> {
    let session = ctx
        .meditation
        .get_session(&session_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Session not found"))?;

    if session.user_id != body.user_id {
        return Err(ApiError::forbidden("Session belongs to another user"));
    }
    if session.is_completed() {
        return Err(ApiError::bad_request("Session already completed"));
    }

    let actual = body
        .actual_duration_minutes
        .unwrap_or(session.duration_minutes as u32);
    let session = ctx.meditation.complete_session(&session_id, actual).await?;

    let streak = ctx
        .streaks
        .record_activity(&body.user_id, StreakDomain::Meditation, Utc::now().date_naive())
        .await?;

    let totals = compute_totals(&ctx.meditation.list_sessions(&body.user_id).await?);
    let unlocked = achievements::check_and_unlock(
        &ctx.meditation,
        &body.user_id,
        totals.completed_sessions,
        streak.current_streak,
    )
    .await?;
    for badge in &unlocked {
        info!(user_id = %body.user_id, badge = %badge.id, "meditation achievement unlocked");
    }

    info!(user_id = %body.user_id, minutes = actual, "meditation session completed");

    Ok(Json(json!({
        "session": session,
        "current_streak": streak.current_streak,
        "longest_streak": streak.longest_streak,
        "achievements": unlocked,
    })))
}

/// GET /api/v1/users/{id}/meditation/stats
pub async fn meditation_stats(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    ctx.users.require(&user_id).await?;

    let sessions = ctx.meditation.list_sessions(&user_id).await?;
    let totals = compute_totals(&sessions);
    let streak = ctx.streaks.get(&user_id, StreakDomain::Meditation).await?;

    Ok(Json(json!({
        "totals": totals,
        "current_streak": streak.current_streak,
        "longest_streak": streak.longest_streak,
    })))
}

/// GET /api/v1/users/{id}/meditation/recommendations
pub async fn recommendations(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    ctx.users.require(&user_id).await?;

    let sessions = ctx.meditation.list_sessions(&user_id).await?;
    let completed: Vec<&MeditationSessionRow> =
        sessions.iter().filter(|s| s.is_completed()).collect();

    if completed.is_empty() {
        return Ok(Json(json!({
            "suggested_duration_minutes": 10,
            "suggested_time": "morning",
            "message": "Start with a short 10 minute session to build the habit",
        })));
    }

    let totals = compute_totals(&sessions);
    let suggested_duration = totals.favorite_duration_minutes.unwrap_or(10);

    let suggested_time = preferred_time_of_day(&completed);

    Ok(Json(json!({
        "suggested_duration_minutes": suggested_duration,
        "suggested_time": suggested_time,
        "message": format!(
            "You meditate best with {suggested_duration} minute sessions in the {suggested_time}"
        ),
    })))
}
