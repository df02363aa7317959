//! Reward-coin ledger. Every credit writes both the balance row and an
//! append-only transaction row; transactions are never deleted.

use anyhow::{Context as _, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CoinTransaction {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    /// "earned" | "spent"
    pub kind: String,
    /// What produced the credit, e.g. "milestone" or "bonus".
    pub source: String,
    pub description: Option<String>,
    pub created_at: String,
}

pub struct CoinLedger {
    pool: SqlitePool,
}

impl CoinLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Credit coins to a user and record the transaction. Returns the new
    /// balance. Callers enforce once-only semantics (e.g. the milestone
    /// completed flag) — the ledger itself just appends.
    pub async fn credit(
        &self,
        user_id: &str,
        amount: i64,
        source: &str,
        description: &str,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await.context("begin coin credit")?;
        let balance = Self::credit_in_tx(&mut tx, user_id, amount, source, description).await?;
        tx.commit().await.context("commit coin credit")?;
        Ok(balance)
    }

    /// The ledger writes (balance upsert + transaction row + balance read)
    /// inside a caller-owned transaction. Used by milestone completion so the
    /// completed flag and the coin credit commit or roll back together.
    pub async fn credit_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        user_id: &str,
        amount: i64,
        source: &str,
        description: &str,
    ) -> Result<i64> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO coin_balances (user_id, balance, updated_at) VALUES (?, ?, ?)
             ON CONFLICT (user_id) DO UPDATE SET
                balance = balance + excluded.balance,
                updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(amount)
        .bind(&now)
        .execute(&mut **tx)
        .await
        .context("update coin balance")?;

        sqlx::query(
            "INSERT INTO coin_transactions (id, user_id, amount, kind, source, description, created_at)
             VALUES (?, ?, ?, 'earned', ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(amount)
        .bind(source)
        .bind(description)
        .bind(&now)
        .execute(&mut **tx)
        .await
        .context("record coin transaction")?;

        let balance: i64 =
            sqlx::query_scalar("SELECT balance FROM coin_balances WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&mut **tx)
                .await
                .context("read coin balance")?;

        Ok(balance)
    }

    /// Current balance; 0 for users who have never earned coins.
    pub async fn balance(&self, user_id: &str) -> Result<i64> {
        let balance: Option<i64> =
            sqlx::query_scalar("SELECT balance FROM coin_balances WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .context("read coin balance")?;
        Ok(balance.unwrap_or(0))
    }

    /// Most recent transactions, newest first.
    pub async fn recent_transactions(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<CoinTransaction>> {
        let rows = sqlx::query_as(
            "SELECT * FROM coin_transactions WHERE user_id = ?
             ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .context("list coin transactions")?;
        Ok(rows)
    }
}
