//! End-to-end API tests. Boots the full server on a random port and walks
//! the HTTP surface with a real client.

use serde_json::{json, Value};
use smiled::{config::ServerConfig, rest, AppContext};
use std::sync::Arc;
use tempfile::TempDir;

struct TestServer {
    base: String,
    client: reqwest::Client,
    _dir: TempDir,
}

async fn boot() -> TestServer {
    let dir = TempDir::new().unwrap();
    let config = Arc::new(ServerConfig::new(
        None,
        Some(dir.path().to_path_buf()),
        Some("error".to_string()),
        None,
    ));
    let ctx = Arc::new(AppContext::init(config).await.unwrap());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = rest::build_router(ctx);
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    TestServer {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
        _dir: dir,
    }
}

impl TestServer {
    async fn create_user(&self, name: &str, email: &str) -> String {
        let resp = self
            .client
            .post(format!("{}/api/v1/users", self.base))
            .json(&json!({ "name": name, "email": email }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let body: Value = resp.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    async fn get_json(&self, path: &str) -> Value {
        let resp = self
            .client
            .get(format!("{}{path}", self.base))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success(), "GET {path} failed");
        resp.json().await.unwrap()
    }
}

fn words(n: usize) -> String {
    vec!["reflect"; n].join(" ")
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let srv = boot().await;
    let body = srv.get_json("/api/v1/health").await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_secs"].is_number());
}

#[tokio::test]
async fn user_creation_validates_input() {
    let srv = boot().await;

    let resp = srv
        .client
        .post(format!("{}/api/v1/users", srv.base))
        .json(&json!({ "name": "Mina", "email": "not-an-email" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    srv.create_user("Mina", "mina@example.com").await;

    // Duplicate email is rejected.
    let resp = srv
        .client
        .post(format!("{}/api/v1/users", srv.base))
        .json(&json!({ "name": "Other", "email": "mina@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn journey_milestones_complete_in_order_and_pay_once() {
    let srv = boot().await;
    let user = srv.create_user("Jo", "jo@example.com").await;

    let journeys = srv.get_json("/api/v1/journeys").await;
    let journey = &journeys["journeys"][0];
    let path_id = journey["path"]["id"].as_str().unwrap();
    let milestones = journey["milestones"].as_array().unwrap();
    assert_eq!(milestones.len(), 7);
    let first = milestones[0]["id"].as_str().unwrap();
    let second = milestones[1]["id"].as_str().unwrap();

    // Completing before starting the journey is rejected.
    let resp = srv
        .client
        .post(format!("{}/api/v1/milestones/{first}/complete", srv.base))
        .json(&json!({ "user_id": user, "content": words(50) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Start is idempotent: 201 then 200.
    let resp = srv
        .client
        .post(format!("{}/api/v1/journeys/{path_id}/start", srv.base))
        .json(&json!({ "user_id": user }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let resp = srv
        .client
        .post(format!("{}/api/v1/journeys/{path_id}/start", srv.base))
        .json(&json!({ "user_id": user }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Skipping ahead is rejected.
    let resp = srv
        .client
        .post(format!("{}/api/v1/milestones/{second}/complete", srv.base))
        .json(&json!({ "user_id": user, "completed_activities": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Cannot skip milestones");

    // A 49-word reflection misses the threshold; 50 words is enough.
    let resp = srv
        .client
        .post(format!("{}/api/v1/milestones/{first}/complete", srv.base))
        .json(&json!({ "user_id": user, "content": words(49) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = srv
        .client
        .post(format!("{}/api/v1/milestones/{first}/complete", srv.base))
        .json(&json!({ "user_id": user, "content": words(50) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["coins_earned"], 50);
    assert_eq!(body["balance"], 50);
    assert_eq!(body["current_streak"], 1);

    // Repeat completion never double-credits.
    let resp = srv
        .client
        .post(format!("{}/api/v1/milestones/{first}/complete", srv.base))
        .json(&json!({ "user_id": user, "content": words(50) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let coins = srv.get_json(&format!("/api/v1/users/{user}/coins")).await;
    assert_eq!(coins["balance"], 50);
    assert_eq!(coins["transactions"].as_array().unwrap().len(), 1);

    let stats = srv
        .get_json(&format!("/api/v1/users/{user}/journeys/stats"))
        .await;
    assert_eq!(stats["total_milestones_completed"], 1);
    assert_eq!(stats["total_coins_earned"], 50);
    assert_eq!(stats["active_days"], 1);
}

#[tokio::test]
async fn meditation_sessions_enforce_presets_and_ownership() {
    let srv = boot().await;
    let user = srv.create_user("Ada", "ada@example.com").await;
    let other = srv.create_user("Ben", "ben@example.com").await;

    let presets = srv.get_json("/api/v1/meditation/presets").await;
    assert!(presets["durations_minutes"]
        .as_array()
        .unwrap()
        .contains(&json!(10)));

    // Off-preset duration is rejected.
    let resp = srv
        .client
        .post(format!("{}/api/v1/meditation/sessions", srv.base))
        .json(&json!({ "user_id": user, "duration_minutes": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = srv
        .client
        .post(format!("{}/api/v1/meditation/sessions", srv.base))
        .json(&json!({ "user_id": user, "duration_minutes": 10, "ambient_sound": "rain" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let session: Value = resp.json().await.unwrap();
    let session_id = session["id"].as_str().unwrap();

    // Another user cannot complete it.
    let resp = srv
        .client
        .post(format!(
            "{}/api/v1/meditation/sessions/{session_id}/complete",
            srv.base
        ))
        .json(&json!({ "user_id": other }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = srv
        .client
        .post(format!(
            "{}/api/v1/meditation/sessions/{session_id}/complete",
            srv.base
        ))
        .json(&json!({ "user_id": user, "actual_duration_minutes": 12 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["current_streak"], 1);
    // One session is short of every badge threshold.
    assert_eq!(body["achievements"], json!([]));

    // Completing twice is rejected.
    let resp = srv
        .client
        .post(format!(
            "{}/api/v1/meditation/sessions/{session_id}/complete",
            srv.base
        ))
        .json(&json!({ "user_id": user }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let stats = srv
        .get_json(&format!("/api/v1/users/{user}/meditation/stats"))
        .await;
    assert_eq!(stats["totals"]["completed_sessions"], 1);
    assert_eq!(stats["totals"]["total_minutes"], 12);
    assert_eq!(stats["current_streak"], 1);

    let rec = srv
        .get_json(&format!("/api/v1/users/{user}/meditation/recommendations"))
        .await;
    assert_eq!(rec["suggested_duration_minutes"], 10);
}

#[tokio::test]
async fn session_badges_unlock_once_at_the_count_threshold() {
    let srv = boot().await;
    let user = srv.create_user("Pia", "pia@example.com").await;

    let mut earned = Vec::new();
    for _ in 0..6 {
        let resp = srv
            .client
            .post(format!("{}/api/v1/meditation/sessions", srv.base))
            .json(&json!({ "user_id": user, "duration_minutes": 5 }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let session: Value = resp.json().await.unwrap();
        let session_id = session["id"].as_str().unwrap().to_string();

        let resp = srv
            .client
            .post(format!(
                "{}/api/v1/meditation/sessions/{session_id}/complete",
                srv.base
            ))
            .json(&json!({ "user_id": user }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        earned.push(body["achievements"].as_array().unwrap().clone());
    }

    // Nothing unlocks before the fifth completed session.
    for badges in &earned[..4] {
        assert!(badges.is_empty());
    }
    assert_eq!(earned[4].len(), 1);
    assert_eq!(earned[4][0]["id"], "meditation_beginner");
    assert_eq!(earned[4][0]["title"], "Meditation Beginner");
    // Once earned, the badge never repeats.
    assert!(earned[5].is_empty());
}

#[tokio::test]
async fn meditation_stats_are_zero_for_fresh_users() {
    let srv = boot().await;
    let user = srv.create_user("Zed", "zed@example.com").await;

    let stats = srv
        .get_json(&format!("/api/v1/users/{user}/meditation/stats"))
        .await;
    assert_eq!(stats["totals"]["total_sessions"], 0);
    assert_eq!(stats["totals"]["completion_rate"], 0.0);
    assert_eq!(stats["current_streak"], 0);
}

#[tokio::test]
async fn activity_flow_tracks_mood_and_feeds_insights() {
    let srv = boot().await;
    let user = srv.create_user("Kim", "kim@example.com").await;
    let other = srv.create_user("Lou", "lou@example.com").await;

    // Recommendations need a mood profile first.
    let resp = srv
        .client
        .get(format!(
            "{}/api/v1/users/{user}/activities/recommended",
            srv.base
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = srv
        .client
        .put(format!("{}/api/v1/users/{user}/mood", srv.base))
        .json(&json!({ "mood_tag": "stress" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let recommended = srv
        .get_json(&format!("/api/v1/users/{user}/activities/recommended"))
        .await;
    let activities = recommended["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 3);
    let activity_id = activities[0]["id"].as_str().unwrap();

    // Mood scores outside 1-10 are rejected.
    let resp = srv
        .client
        .post(format!("{}/api/v1/activities/{activity_id}/start", srv.base))
        .json(&json!({ "user_id": user, "mood_before": 11 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = srv
        .client
        .post(format!("{}/api/v1/activities/{activity_id}/start", srv.base))
        .json(&json!({ "user_id": user, "mood_before": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let started: Value = resp.json().await.unwrap();
    let run_id = started["run"]["id"].as_str().unwrap();

    // A run belonging to someone else reads as not found.
    let resp = srv
        .client
        .post(format!(
            "{}/api/v1/activities/runs/{run_id}/complete",
            srv.base
        ))
        .json(&json!({ "user_id": other, "mood_after": 8 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = srv
        .client
        .post(format!(
            "{}/api/v1/activities/runs/{run_id}/complete",
            srv.base
        ))
        .json(&json!({ "user_id": user, "mood_after": 8, "effectiveness_rating": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["mood_improvement"], 5);
    assert_eq!(body["current_streak"], 1);

    // Completing twice is rejected.
    let resp = srv
        .client
        .post(format!(
            "{}/api/v1/activities/runs/{run_id}/complete",
            srv.base
        ))
        .json(&json!({ "user_id": user, "mood_after": 9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Feedback can still be amended after completion.
    let resp = srv
        .client
        .patch(format!(
            "{}/api/v1/activities/runs/{run_id}/feedback",
            srv.base
        ))
        .json(&json!({ "user_id": user, "feedback": "really helped" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["run"]["feedback"], "really helped");

    let stats = srv
        .get_json(&format!("/api/v1/users/{user}/activities/stats"))
        .await;
    assert_eq!(stats["streak_stats"]["current_streak"], 1);
    assert_eq!(stats["mood_stats"]["activities_with_improvement"], 1);
    assert_eq!(
        stats["most_effective_activities"][0]["effectiveness_rating"],
        5
    );

    let insights = srv
        .get_json(&format!("/api/v1/users/{user}/activities/insights"))
        .await;
    assert_eq!(insights["stats"]["total_completed"], 1);
    assert_eq!(insights["stats"]["average_improvement"], 5.0);
    assert!(insights["stats"]["best_category"].is_string());
    assert!(insights["recommendation"]
        .as_str()
        .unwrap()
        .contains("work best"));
}

#[tokio::test]
async fn streak_listing_covers_all_domains() {
    let srv = boot().await;
    let user = srv.create_user("Nia", "nia@example.com").await;

    let body = srv.get_json(&format!("/api/v1/users/{user}/streaks")).await;
    let streaks = body["streaks"].as_array().unwrap();
    assert_eq!(streaks.len(), 3);
    for streak in streaks {
        assert_eq!(streak["current_streak"], 0);
        assert_eq!(streak["total_completed"], 0);
    }

    // Unknown users get a 404, not an empty list.
    let resp = srv
        .client
        .get(format!("{}/api/v1/users/ghost/streaks", srv.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
