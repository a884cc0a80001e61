//! SQLite storage: pool setup, embedded schema and the user repository.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

pub mod users;

pub use users::{StoreHealth, UserRepository};

const SCHEMA: &str = include_str!("../../migrations/0001_create_users.sql");

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("user already exists: {0}")]
    Conflict(String),

    #[error("user not found: {0}")]
    NotFound(String),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Open a pool for `database_url` and make sure the schema exists.
///
/// An in-memory database lives only as long as its connection, so it gets a
/// single connection that is never reaped.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, RepositoryError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| RepositoryError::Migration(e.to_string()))?;
    tracing::debug!("database schema verified");
    Ok(())
}
