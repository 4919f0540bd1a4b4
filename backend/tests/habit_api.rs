//! Integration tests for the habit endpoints
//!
//! Drives the full router against a fresh in-memory database per test.

use axum::http::{Method, StatusCode};
use chrono::Duration;
use serde_json::json;
use uuid::Uuid;

mod support;
use support::setup_test_app;

#[tokio::test]
async fn test_health_reports_database() {
    let app = setup_test_app().await;
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_create_habit_applies_defaults() {
    let app = setup_test_app().await;
    let (status, habit) = app
        .post("/api/habits", json!({ "name": "  Drink water  " }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(habit["name"], "Drink water");
    assert_eq!(habit["frequency"], "daily");
    assert_eq!(habit["target_count"], 1);
    assert_eq!(habit["is_active"], true);
    assert_eq!(habit["start_date"], json!(app.now()));
    assert_eq!(habit["current_streak"], 0);
    assert_eq!(habit["total_entries"], 0);
    assert_eq!(habit["is_completed_today"], false);
}

#[tokio::test]
async fn test_create_habit_rejects_invalid_fields() {
    let app = setup_test_app().await;
    let (status, body) = app
        .post("/api/habits", json!({ "name": "", "target_count": 0 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["details"]["name"].is_array());
    assert!(body["error"]["details"]["target_count"].is_array());
}

#[tokio::test]
async fn test_create_habit_rejects_end_before_start() {
    let app = setup_test_app().await;
    let now = app.now();
    let (status, body) = app
        .post(
            "/api/habits",
            json!({
                "name": "Stretch",
                "start_date": now.to_rfc3339(),
                "end_date": (now - Duration::days(1)).to_rfc3339(),
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_habits_are_scoped_to_owner() {
    let app = setup_test_app().await;
    let id = app.create_habit(json!({ "name": "Journal" })).await;
    let stranger = Some(Uuid::new_v4());

    let (status, list) = app.send(Method::GET, "/api/habits", stranger, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(0));

    let uri = format!("/api/habits/{id}");
    let (status, body) = app.send(Method::GET, &uri, stranger, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = app.send(Method::DELETE, &uri, stranger, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_identity_header_is_rejected() {
    let app = setup_test_app().await;
    let request = axum::http::Request::builder()
        .uri("/api/habits")
        .header("x-user-id", "not-a-uuid")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_habit_is_partial() {
    let app = setup_test_app().await;
    let id = app
        .create_habit(json!({ "name": "Read", "unit": "pages", "target_count": 2 }))
        .await;

    let uri = format!("/api/habits/{id}");
    let (status, habit) = app
        .send(
            Method::PUT,
            &uri,
            None,
            Some(json!({ "name": "Read fiction", "is_active": false })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(habit["name"], "Read fiction");
    assert_eq!(habit["unit"], "pages");
    assert_eq!(habit["target_count"], 2);
    assert_eq!(habit["is_active"], false);

    let (_, active) = app.get("/api/habits?active=true").await;
    assert_eq!(active.as_array().map(Vec::len), Some(0));
    let (_, inactive) = app.get("/api/habits?active=false").await;
    assert_eq!(inactive.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_update_missing_habit_is_not_found() {
    let app = setup_test_app().await;
    let uri = format!("/api/habits/{}", Uuid::new_v4());
    let (status, _) = app
        .send(Method::PUT, &uri, None, Some(json!({ "name": "Nope" })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_habit_cascades_entries() {
    let app = setup_test_app().await;
    let id = app.create_habit(json!({ "name": "Walk" })).await;
    app.post("/api/entries", json!({ "habit_id": id })).await;
    app.post("/api/entries", json!({ "habit_id": id, "count": 2 }))
        .await;
    assert_eq!(app.entry_count().await, 2);

    let uri = format!("/api/habits/{id}");
    let (status, body) = app.send(Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    assert_eq!(app.entry_count().await, 0);
    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_for_three_day_run() {
    let app = setup_test_app().await;
    let now = app.now();
    let id = app
        .create_habit(json!({
            "name": "Meditate",
            "start_date": (now - Duration::days(4)).to_rfc3339(),
        }))
        .await;

    for days_ago in 0..3 {
        let completed_at = (now - Duration::days(days_ago)).to_rfc3339();
        let (status, _) = app
            .post("/api/entries", json!({ "habit_id": id, "completed_at": completed_at }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, stats) = app.get(&format!("/api/habits/{id}/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["current_streak"], 3);
    assert_eq!(stats["longest_streak"], 3);
    assert_eq!(stats["days_active"], 5);
    assert_eq!(stats["completion_rate"], 60.0);
    assert_eq!(stats["total_completions"], 3);
    assert!(stats["average_value"].is_null());

    let (_, habit) = app.get(&format!("/api/habits/{id}")).await;
    assert_eq!(habit["current_streak"], 3);
    assert_eq!(habit["total_entries"], 3);
    assert_eq!(habit["is_completed_today"], true);
}

#[tokio::test]
async fn test_stats_for_weekly_habit_has_no_current_streak() {
    let app = setup_test_app().await;
    let now = app.now();
    let id = app
        .create_habit(json!({
            "name": "Call family",
            "frequency": "weekly",
            "start_date": (now - Duration::days(6)).to_rfc3339(),
        }))
        .await;

    for days_ago in 0..2 {
        let completed_at = (now - Duration::days(days_ago)).to_rfc3339();
        app.post("/api/entries", json!({ "habit_id": id, "completed_at": completed_at }))
            .await;
    }

    let (_, stats) = app.get(&format!("/api/habits/{id}/stats")).await;
    assert_eq!(stats["current_streak"], 0);
    assert_eq!(stats["longest_streak"], 2);
}

#[tokio::test]
async fn test_stats_for_habit_without_entries() {
    let app = setup_test_app().await;
    let id = app.create_habit(json!({ "name": "Floss" })).await;

    let (status, stats) = app.get(&format!("/api/habits/{id}/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["current_streak"], 0);
    assert_eq!(stats["longest_streak"], 0);
    assert_eq!(stats["completion_rate"], 0.0);
    assert_eq!(stats["days_active"], 1);
    assert!(stats["average_value"].is_null());
    assert!(stats["best_value"].is_null());
    assert!(stats["last_completed_at"].is_null());
}
