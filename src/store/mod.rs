//! Account persistence.
//!
//! A store owns the account records and performs plain reads and writes. It
//! gives no concurrency guarantees for balance updates: the ledger serializes
//! every write to a given account before it reaches the store.

use std::future::Future;

use crate::models::account::{Account, AccountId, NewAccount};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("account not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Key-value persistence of account records, keyed by id.
pub trait AccountStore: Send + Sync + 'static {
    /// Inserts an account with a zero balance and returns its new id.
    ///
    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken.
    fn insert(
        &self,
        account: NewAccount,
    ) -> impl Future<Output = Result<AccountId, StoreError>> + Send;

    /// Fails with [`StoreError::NotFound`] if no such id exists.
    fn get(&self, id: AccountId) -> impl Future<Output = Result<Account, StoreError>> + Send;

    /// Unconditionally overwrites the balance of an existing account.
    fn set_balance(
        &self,
        id: AccountId,
        balance_cents: i64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Number of stored accounts.
    fn count(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Checks that the backend is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
