// Shared test doubles

use std::sync::Arc;

use tokio::sync::Notify;
use user_balance_server::{
    models::account::{Account, AccountId, NewAccount},
    store::{AccountStore, MemoryStore, StoreError},
};

/// Store whose writes to one account block until released.
pub struct StallingStore {
    inner: MemoryStore,
    stalled: AccountId,
    release: Arc<Notify>,
}

impl StallingStore {
    pub fn new(stalled: AccountId) -> (Self, Arc<Notify>) {
        let release = Arc::new(Notify::new());
        let store = Self {
            inner: MemoryStore::new(),
            stalled,
            release: Arc::clone(&release),
        };
        (store, release)
    }
}

impl AccountStore for StallingStore {
    async fn insert(&self, account: NewAccount) -> Result<AccountId, StoreError> {
        self.inner.insert(account).await
    }

    async fn get(&self, id: AccountId) -> Result<Account, StoreError> {
        self.inner.get(id).await
    }

    async fn set_balance(&self, id: AccountId, balance_cents: i64) -> Result<(), StoreError> {
        if id == self.stalled {
            self.release.notified().await;
        }
        self.inner.set_balance(id, balance_cents).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.inner.count().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
