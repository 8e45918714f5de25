//! PostgreSQL store
//!
//! `accounts` and `users` tables, see `db::ensure_schema`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Account, NewUser, User};

use super::{AccountStore, StoreError, StoreResult, UserStore};

/// PostgreSQL-backed account and user store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_by_user_id(&self, user_id: i64) -> StoreResult<Option<Account>> {
        let row: Option<(i64, i64, Decimal)> =
            sqlx::query_as("SELECT id, user_id, balance FROM accounts WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(id, user_id, balance)| Account::new(id, user_id, balance)))
    }

    async fn save(&self, account: &Account) -> StoreResult<()> {
        let rows_affected = sqlx::query("UPDATE accounts SET balance = $2 WHERE id = $1")
            .bind(account.id())
            .bind(account.balance())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::Missing(format!("account {}", account.id())));
        }

        Ok(())
    }

    async fn save_transfer(&self, sender: &Account, recipient: &Account) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for account in [sender, recipient] {
            let rows_affected = sqlx::query("UPDATE accounts SET balance = $2 WHERE id = $1")
                .bind(account.id())
                .bind(account.balance())
                .execute(&mut *tx)
                .await?
                .rows_affected();

            if rows_affected == 0 {
                // Dropping the transaction rolls back the other row
                return Err(StoreError::Missing(format!("account {}", account.id())));
            }
        }

        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row: Option<(i64, String, String, String, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username, email, password_hash, created_at)| User {
            id,
            username,
            email,
            password_hash,
            created_at,
        }))
    }

    async fn register(&self, new_user: &NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE username = $1 OR email = $2")
                .bind(&new_user.username)
                .bind(&new_user.email)
                .fetch_optional(&mut *tx)
                .await?;

        if existing.is_some() {
            return Err(StoreError::Conflict(
                "username or email already registered".to_string(),
            ));
        }

        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query("INSERT INTO accounts (user_id, balance) VALUES ($1, 0)")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(user_id = id, username = %new_user.username, "User and account inserted");

        Ok(User {
            id,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at,
        })
    }
}

/// A concurrent registration can slip past the existence check
fn map_unique_violation(error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict("username or email already registered".to_string())
        }
        _ => StoreError::Database(error),
    }
}
