use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::AppContext;

use super::MOOD_TAGS;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// POST /api/v1/users
pub async fn create_user(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let name = body.name.trim();
    let email = body.email.trim();
    if name.is_empty() || email.is_empty() {
        return Err(ApiError::bad_request("name and email are required"));
    }
    if !email.contains('@') {
        return Err(ApiError::bad_request("invalid email address"));
    }
    if ctx.users.email_taken(email).await? {
        return Err(ApiError::bad_request("email already registered"));
    }

    let user = ctx.users.create(name, email).await?;
    info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(json!(user))))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let user = ctx.users.require(&id).await?;
    Ok(Json(json!(user)))
}

#[derive(Deserialize)]
pub struct SetMoodRequest {
    pub mood_tag: String,
}

/// PUT /api/v1/users/{id}/mood — set the smile-reason mood tag used to match
/// the user to activities.
pub async fn set_mood(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(body): Json<SetMoodRequest>,
) -> ApiResult<Json<Value>> {
    ctx.users.require(&id).await?;

    let tag = body.mood_tag.trim().to_ascii_lowercase();
    if !MOOD_TAGS.contains(&tag.as_str()) {
        return Err(ApiError::bad_request(format!(
            "unknown mood tag — expected one of: {}",
            MOOD_TAGS.join(", ")
        )));
    }

    ctx.users.set_mood_tag(&id, &tag).await?;
    Ok(Json(json!({ "message": "Mood profile updated", "mood_tag": tag })))
}

/// GET /api/v1/users/{id}/coins — balance plus recent transactions.
pub async fn get_coins(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    ctx.users.require(&id).await?;

    let balance = ctx.coins.balance(&id).await?;
    let transactions = ctx
        .coins
        .recent_transactions(&id, ctx.config.progress.recent_transactions)
        .await?;

    Ok(Json(json!({
        "balance": balance,
        "transactions": transactions,
    })))
}
