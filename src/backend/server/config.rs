/**
 * Server Configuration
 *
 * Turns the injected `AppConfig` into concrete services, focusing on the
 * backing store selection.
 *
 * # Error Handling
 *
 * Store setup errors are logged but do not prevent server startup: when
 * the database is unavailable the server falls back to the in-memory
 * store, so the app degrades instead of refusing to boot.
 */

use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::store::{MemoryStore, PostgresStore, StateStore};
use crate::shared::config::AppConfig;

/// Build the backing document store for this process.
///
/// With a `database_url`: connect, run migrations, return the Postgres
/// store. Without one (or when the connection fails): warn and return the
/// in-memory store.
pub async fn load_store(config: &AppConfig) -> Arc<dyn StateStore> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set. Falling back to the in-memory store.");
        return Arc::new(MemoryStore::new());
    };

    tracing::info!("Connecting to database...");
    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to the in-memory store.");
            return Arc::new(MemoryStore::new());
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => {
            tracing::info!("Database migrations completed successfully");
        }
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            // Continue anyway - migrations might have already been run
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Arc::new(PostgresStore::new(pool))
}
