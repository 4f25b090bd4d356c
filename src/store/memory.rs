//! In-process account store, used when no database is configured and in tests.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::{AccountStore, StoreError};
use crate::models::account::{Account, AccountId, NewAccount};

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    // email -> id, checked under the same write lock as the insert
    emails: HashMap<String, AccountId>,
    last_id: AccountId,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for MemoryStore {
    async fn insert(&self, account: NewAccount) -> Result<AccountId, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.emails.contains_key(&account.email) {
            return Err(StoreError::DuplicateEmail);
        }

        tables.last_id += 1;
        let id = tables.last_id;
        tables.emails.insert(account.email.clone(), id);
        tables.accounts.insert(
            id,
            Account {
                id,
                name: account.name,
                email: account.email,
                credential_hash: account.credential_hash,
                balance_cents: 0,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn get(&self, id: AccountId) -> Result<Account, StoreError> {
        self.tables
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn set_balance(&self, id: AccountId, balance_cents: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let account = tables.accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.balance_cents = balance_cents;
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.tables.read().await.accounts.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: "Ada".to_string(),
            email: email.to_string(),
            credential_hash: "sha256$00$00".to_string(),
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids_from_one() {
        let store = MemoryStore::new();
        assert_eq!(store.insert(new_account("a@example.com")).await.unwrap(), 1);
        assert_eq!(store.insert(new_account("b@example.com")).await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn new_accounts_start_at_zero() {
        let store = MemoryStore::new();
        let id = store.insert(new_account("a@example.com")).await.unwrap();
        let account = store.get(id).await.unwrap();
        assert_eq!(account.balance_cents, 0);
        assert_eq!(account.email, "a@example.com");
    }

    #[tokio::test]
    async fn rejects_duplicate_email_without_consuming_an_id() {
        let store = MemoryStore::new();
        store.insert(new_account("a@example.com")).await.unwrap();
        let err = store.insert(new_account("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.insert(new_account("b@example.com")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn missing_accounts_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.get(7).await, Err(StoreError::NotFound)));
        assert!(matches!(
            store.set_balance(7, 100).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn set_balance_overwrites() {
        let store = MemoryStore::new();
        let id = store.insert(new_account("a@example.com")).await.unwrap();
        store.set_balance(id, 4200).await.unwrap();
        assert_eq!(store.get(id).await.unwrap().balance_cents, 4200);
    }
}
