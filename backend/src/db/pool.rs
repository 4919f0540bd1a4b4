use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub async fn create_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database url: {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives only as long as its connection, so keep
    // exactly one open for the lifetime of the pool.
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let max_connections = if in_memory { 1 } else { 5 };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .context("Failed to create database pool")
}

pub async fn run_migrations(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("Failed to run database migrations")
}
