//! Database gateway: one pool per process.

use crate::config::DbConfig;
use crate::error::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Open the pool and verify a connection can be made.
pub async fn connect(config: &DbConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await?;
    tracing::info!(
        host = config.host.as_deref().unwrap_or("default"),
        database = config.dbname.as_deref().unwrap_or("default"),
        "successfully connected to database"
    );
    Ok(pool)
}
