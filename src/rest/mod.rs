// rest/mod.rs — Public REST API server.
//
// Axum HTTP server, local only by default. Routes bridge to the per-domain
// handler modules.
//
// Endpoints:
//   POST  /api/v1/users
//   GET   /api/v1/users/{id}
//   PUT   /api/v1/users/{id}/mood
//   GET   /api/v1/users/{id}/streaks
//   GET   /api/v1/users/{id}/coins
//   GET   /api/v1/journeys
//   POST  /api/v1/journeys/{path_id}/start
//   POST  /api/v1/milestones/{id}/complete
//   GET   /api/v1/users/{id}/journeys
//   GET   /api/v1/users/{id}/journeys/stats
//   GET   /api/v1/meditation/presets
//   POST  /api/v1/meditation/sessions
//   POST  /api/v1/meditation/sessions/{id}/complete
//   GET   /api/v1/users/{id}/meditation/stats
//   GET   /api/v1/users/{id}/meditation/recommendations
//   GET   /api/v1/users/{id}/activities/recommended
//   POST  /api/v1/activities/{id}/start
//   POST  /api/v1/activities/runs/{run_id}/complete
//   PATCH /api/v1/activities/runs/{run_id}/feedback
//   GET   /api/v1/users/{id}/activities/stats
//   GET   /api/v1/users/{id}/activities/insights
//   GET   /api/v1/health

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{activities, journeys, sessions, streaks, users, AppContext};

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health
        .route("/api/v1/health", get(routes::health::health))
        // Users
        .route("/api/v1/users", post(users::handlers::create_user))
        .route("/api/v1/users/{id}", get(users::handlers::get_user))
        .route("/api/v1/users/{id}/mood", put(users::handlers::set_mood))
        .route(
            "/api/v1/users/{id}/streaks",
            get(streaks::handlers::list_streaks),
        )
        .route("/api/v1/users/{id}/coins", get(users::handlers::get_coins))
        // Journeys
        .route("/api/v1/journeys", get(journeys::handlers::list_journeys))
        .route(
            "/api/v1/journeys/{path_id}/start",
            post(journeys::handlers::start_journey),
        )
        .route(
            "/api/v1/milestones/{id}/complete",
            post(journeys::handlers::complete_milestone),
        )
        .route(
            "/api/v1/users/{id}/journeys",
            get(journeys::handlers::user_journeys),
        )
        .route(
            "/api/v1/users/{id}/journeys/stats",
            get(journeys::handlers::journey_stats),
        )
        // Meditation
        .route(
            "/api/v1/meditation/presets",
            get(sessions::handlers::presets),
        )
        .route(
            "/api/v1/meditation/sessions",
            post(sessions::handlers::create_session),
        )
        .route(
            "/api/v1/meditation/sessions/{id}/complete",
            post(sessions::handlers::complete_session),
        )
        .route(
            "/api/v1/users/{id}/meditation/stats",
            get(sessions::handlers::meditation_stats),
        )
        .route(
            "/api/v1/users/{id}/meditation/recommendations",
            get(sessions::handlers::recommendations),
        )
        // Activities
        .route(
            "/api/v1/users/{id}/activities/recommended",
            get(activities::handlers::recommended),
        )
        .route(
            "/api/v1/activities/{id}/start",
            post(activities::handlers::start_run),
        )
        .route(
            "/api/v1/activities/runs/{run_id}/complete",
            post(activities::handlers::complete_run),
        )
        .route(
            "/api/v1/activities/runs/{run_id}/feedback",
            patch(activities::handlers::update_feedback),
        )
        .route(
            "/api/v1/users/{id}/activities/stats",
            get(activities::handlers::activity_stats),
        )
        .route(
            "/api/v1/users/{id}/activities/insights",
            get(activities::handlers::activity_insights),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
