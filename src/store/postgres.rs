//! PostgreSQL-backed account store.
//!
//! Schema lives in `migrations/`. The `UNIQUE(email)` constraint is what
//! enforces email uniqueness here, so concurrent inserts race safely.

use super::{AccountStore, StoreError};
use crate::{
    db::DbPool,
    models::account::{Account, AccountId, NewAccount},
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl AccountStore for PgStore {
    async fn insert(&self, account: NewAccount) -> Result<AccountId, StoreError> {
        let inserted = sqlx::query_scalar::<_, AccountId>(
            r#"
            INSERT INTO users (name, email, credential_hash, balance_cents)
            VALUES ($1, $2, $3, 0)
            RETURNING id
            "#,
        )
        .bind(account.name)
        .bind(account.email)
        .bind(account.credential_hash)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(StoreError::DuplicateEmail)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get(&self, id: AccountId) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, credential_hash, balance_cents, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn set_balance(&self, id: AccountId, balance_cents: i64) -> Result<(), StoreError> {
        let updated = sqlx::query("UPDATE users SET balance_cents = $1 WHERE id = $2")
            .bind(balance_cents)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
