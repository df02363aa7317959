use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::AppContext;

use super::StreakDomain;

/// GET /api/v1/users/{id}/streaks — streak records across all domains.
/// Domains with no recorded activity report a zeroed record.
pub async fn list_streaks(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    ctx.users.require(&user_id).await?;

    let mut streaks = Vec::with_capacity(StreakDomain::ALL.len());
    for domain in StreakDomain::ALL {
        let record = ctx.streaks.get(&user_id, domain).await?;
        streaks.push(json!({
            "domain": domain.as_str(),
            "current_streak": record.current_streak,
            "longest_streak": record.longest_streak,
            "last_activity_date": record.last_activity_date,
            "total_completed": record.total_completed,
        }));
    }

    Ok(Json(json!({ "streaks": streaks })))
}
