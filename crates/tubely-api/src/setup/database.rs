//! Database setup and initialization

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tubely_core::Config;
use tubely_db::{InMemoryVideoRepository, PgVideoRepository, VideoRepository};

/// Connect to Postgres and run migrations, or fall back to the in-memory
/// store when no `DATABASE_URL` is configured.
pub async fn setup_database(config: &Config) -> Result<Arc<dyn VideoRepository>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, using in-memory video store");
        return Ok(Arc::new(InMemoryVideoRepository::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database connected and migrations applied");

    Ok(Arc::new(PgVideoRepository::new(pool)))
}
