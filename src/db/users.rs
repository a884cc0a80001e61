//! User repository.
//!
//! Single-record operations rely on SQLite's own atomicity; the only
//! multi-statement operation (`update`) runs in a transaction.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;

use super::RepositoryError;
use crate::model::user::{NewUser, User, UserUpdate};

const USER_COLUMNS: &str = "id, name, phone, address, created_at, updated_at";

/// Store reachability as reported by `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_count: Option<i64>,
}

impl StoreHealth {
    pub fn is_reachable(&self) -> bool {
        self.user_count.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new user with `created_at = updated_at = now`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id is already stored.
    pub async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let user = new_user.into_user(Utc::now());

        let inserted = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO NOTHING
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        inserted.ok_or(RepositoryError::Conflict(user.id))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this id.
    pub async fn get(&self, id: &str) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(id.to_owned()))
    }

    /// All stored ids in insertion order.
    pub async fn list_ids(&self) -> Result<Vec<String>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, String>("SELECT id FROM users ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn exists(&self, id: &str) -> Result<bool, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Apply a partial update and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this id.
    pub async fn update(&self, id: &str, update: UserUpdate) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| RepositoryError::NotFound(id.to_owned()))?;

        update.apply(&mut user, Utc::now());

        sqlx::query("UPDATE users SET name = ?, phone = ?, address = ?, updated_at = ? WHERE id = ?")
            .bind(&user.name)
            .bind(&user.phone)
            .bind(&user.address)
            .bind(user.updated_at)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Returns `false` if there was nothing to delete.
    pub async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn health(&self) -> StoreHealth {
        match self.count().await {
            Ok(count) => StoreHealth {
                status: "healthy",
                user_count: Some(count),
            },
            Err(e) => {
                tracing::error!(error = %e, "store health check failed");
                StoreHealth {
                    status: "unhealthy",
                    user_count: None,
                }
            }
        }
    }
}
