use axum::{extract::State, http::StatusCode, Json};

use crate::dto::HealthResponse;
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if database { "ok" } else { "degraded" }.into(),
            service: "habitarc-lite".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            database,
        }),
    )
}
