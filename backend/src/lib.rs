use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod clock;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod seed;
pub mod services;

use clock::Clock;
use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub clock: Clock,
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Habits
        .route(
            "/api/habits",
            get(handlers::habits::list_habits).post(handlers::habits::create_habit),
        )
        .route(
            "/api/habits/:id",
            get(handlers::habits::get_habit)
                .put(handlers::habits::update_habit)
                .delete(handlers::habits::delete_habit),
        )
        .route(
            "/api/habits/:id/stats",
            get(handlers::habits::get_habit_stats),
        )
        .route(
            "/api/habits/:id/entries",
            get(handlers::habits::list_habit_entries),
        )
        .route(
            "/api/habits/:id/complete",
            post(handlers::habits::complete_habit),
        )
        // Entries
        .route(
            "/api/entries",
            get(handlers::entries::list_entries).post(handlers::entries::create_entry),
        )
        .route(
            "/api/entries/recent",
            get(handlers::entries::list_recent_entries),
        )
        .route(
            "/api/entries/date/:date",
            get(handlers::entries::list_entries_by_date),
        )
        .route(
            "/api/entries/:id",
            get(handlers::entries::get_entry)
                .put(handlers::entries::update_entry)
                .delete(handlers::entries::delete_entry),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity::resolve_identity,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(identity::USER_ID_HEADER),
        ])
}
