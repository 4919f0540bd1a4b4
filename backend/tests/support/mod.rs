#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use uuid::Uuid;

use habitarc_lite::{build_router, clock::Clock, config::Config, db, AppState};

/// Router plus a handle on its fresh in-memory database.
pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    now: DateTime<Utc>,
}

/// The instant every test app reports as "now".
fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 14, 30, 0).unwrap()
}

pub async fn setup_test_app() -> TestApp {
    let config = Config::default();
    let db = db::create_pool(&config.database_url)
        .await
        .expect("failed to open in-memory database");
    db::run_migrations(&db)
        .await
        .expect("failed to run migrations");

    let now = fixed_now();
    let router = build_router(AppState {
        db: db.clone(),
        config: Arc::new(config),
        clock: Clock::Fixed(now),
    });
    TestApp { router, db, now }
}

impl TestApp {
    /// The clock the handlers see.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Send a request as `user` (or the default user) and decode the JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, None, Some(body)).await
    }

    /// Create a habit for the default user and return its id.
    pub async fn create_habit(&self, body: Value) -> String {
        let (status, habit) = self.post("/api/habits", body).await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {habit}");
        habit["id"].as_str().expect("habit id").to_string()
    }

    pub async fn entry_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM habit_entries")
            .fetch_one(&self.db)
            .await
            .expect("count entries")
    }
}
