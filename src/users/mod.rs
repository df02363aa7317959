//! Minimal user records. No credentials or sessions — identity arrives as an
//! explicit user id on each request. The mood tag ("smile reason") is the
//! label the activity recommendations key on.

pub mod handlers;

use anyhow::{Context as _, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::ApiError;

/// Recognised mood tags, matching the activity catalogue groups.
pub const MOOD_TAGS: [&str; 5] = [
    "anxiety",
    "depression",
    "stress",
    "loneliness",
    "overwhelmed",
];

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mood_tag: Option<String>,
    pub created_at: String,
}

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str, email: &str) -> Result<UserRow> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(email)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .context("create user")?;
        self.get(&id)
            .await?
            .context("user vanished after insert")
    }

    pub async fn get(&self, id: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("load user")?;
        Ok(row)
    }

    pub async fn email_taken(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .context("check email")?;
        Ok(count > 0)
    }

    pub async fn set_mood_tag(&self, id: &str, mood_tag: &str) -> Result<()> {
        sqlx::query("UPDATE users SET mood_tag = ? WHERE id = ?")
            .bind(mood_tag)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("set mood tag")?;
        Ok(())
    }

    /// Load a user or fail with 404 — the ownership guard every per-user
    /// endpoint starts with.
    pub async fn require(&self, id: &str) -> Result<UserRow, ApiError> {
        self.get(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }
}
