use std::sync::Arc;

use anyhow::Context;
use habitarc_lite::{build_router, clock::Clock, config::Config, db, seed, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "habitarc_lite=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    // Database
    let db = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db).await?;
    tracing::info!("Database schema ready");

    let clock = Clock::System;

    if config.seed_sample_data {
        seed::seed_sample_data(&db, config.default_user_id, clock.now()).await?;
        tracing::info!(user_id = %config.default_user_id, "Sample data seeded");
    }

    let state = AppState {
        db,
        config: config.clone(),
        clock,
    };
    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
