//! Balance ledger - the only writer of account balances.
//!
//! # Atomicity Guarantees
//!
//! Every operation that reads or writes a balance first takes the account's
//! serialization unit from the [`LockRegistry`], so for one account the
//! read-validate-write sequence of [`Ledger::apply_delta`] never interleaves
//! with another. Units are per account: traffic on one account never waits
//! on another.
//!
//! A rejected delta leaves the stored balance untouched.

use crate::{
    models::{
        account::{AccountId, NewAccount},
        amount::{Amount, AmountError},
    },
    services::lock_registry::LockRegistry,
    store::{AccountStore, StoreError},
};

/// Validated input for [`Ledger::create_account`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountInput {
    pub name: String,
    pub email: String,
    pub credential_hash: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Account not found")]
    NotFound,

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Internal fault: {0}")]
    Internal(#[source] sqlx::Error),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => LedgerError::DuplicateEmail,
            StoreError::NotFound => LedgerError::NotFound,
            StoreError::Database(err) => LedgerError::Internal(err),
        }
    }
}

pub struct Ledger<S> {
    store: S,
    locks: LockRegistry,
}

impl<S: AccountStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: LockRegistry::new(),
        }
    }

    /// Creates an account with a zero balance and returns its id.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: blank name, email or credential hash
    /// - `DuplicateEmail`: the email belongs to another account
    pub async fn create_account(&self, input: CreateAccountInput) -> Result<AccountId, LedgerError> {
        if input.name.trim().is_empty() {
            return Err(LedgerError::InvalidInput("name must not be empty".to_string()));
        }
        // Sanity check only; the full email grammar is applied by the validator.
        if !input.email.contains('@') {
            return Err(LedgerError::InvalidInput("email is malformed".to_string()));
        }
        if input.credential_hash.is_empty() {
            return Err(LedgerError::InvalidInput(
                "credential hash must not be empty".to_string(),
            ));
        }

        let id = self
            .store
            .insert(NewAccount {
                name: input.name,
                email: input.email,
                credential_hash: input.credential_hash,
            })
            .await?;

        tracing::info!(account_id = id, "account created");
        Ok(id)
    }

    /// Reads the current balance, ordered after any mutation already holding the account.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_balance(&self, id: AccountId) -> Result<Amount, LedgerError> {
        let _guard = self.locks.lock(id).await;
        Ok(self.store.get(id).await?.balance())
    }

    /// Adds a signed `delta` to the balance of `id` and returns the new balance.
    ///
    /// # Process
    ///
    /// 1. Acquire the account's serialization unit
    /// 2. Read the current balance
    /// 3. Reject if the sum overflows or would go below zero
    /// 4. Write the new balance
    /// 5. Release the unit (on drop)
    ///
    /// # Errors
    ///
    /// - `NotFound`: account doesn't exist
    /// - `InsufficientFunds`: the result would be negative
    /// - `InvalidAmount`: the result does not fit the amount range
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn apply_delta(&self, id: AccountId, delta: Amount) -> Result<Amount, LedgerError> {
        let _guard = self.locks.lock(id).await;

        let current = self.store.get(id).await?.balance();
        let updated = current
            .checked_add(delta)
            .ok_or(LedgerError::InvalidAmount(AmountError::OutOfRange))?;
        if updated.is_negative() {
            tracing::warn!(account_id = id, %current, %delta, "rejected delta: insufficient funds");
            return Err(LedgerError::InsufficientFunds);
        }

        self.store.set_balance(id, updated.cents()).await?;
        Ok(updated)
    }

    pub async fn account_count(&self) -> Result<u64, LedgerError> {
        Ok(self.store.count().await?)
    }

    /// Checks that the underlying store is reachable.
    pub async fn ping(&self) -> Result<(), LedgerError> {
        Ok(self.store.ping().await?)
    }

    /// Number of per-account units the registry is tracking.
    pub fn tracked_units(&self) -> usize {
        self.locks.tracked()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    fn input(email: &str) -> CreateAccountInput {
        CreateAccountInput {
            name: "Ada".to_string(),
            email: email.to_string(),
            credential_hash: "sha256$00$00".to_string(),
        }
    }

    fn cents(value: i64) -> Amount {
        Amount::from_cents(value)
    }

    #[tokio::test]
    async fn new_account_has_zero_balance() {
        let ledger = Ledger::new(MemoryStore::new());
        let id = ledger.create_account(input("a@example.com")).await.unwrap();
        assert_eq!(ledger.get_balance(id).await.unwrap(), Amount::ZERO);
    }

    #[tokio::test]
    async fn duplicate_email_leaves_count_unchanged() {
        let ledger = Ledger::new(MemoryStore::new());
        ledger.create_account(input("a@example.com")).await.unwrap();

        let err = ledger.create_account(input("a@example.com")).await.unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateEmail));
        assert_eq!(ledger.account_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn blank_fields_are_invalid_input() {
        let ledger = Ledger::new(MemoryStore::new());
        let mut blank_name = input("a@example.com");
        blank_name.name = "   ".to_string();
        assert!(matches!(
            ledger.create_account(blank_name).await,
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            ledger.create_account(input("not-an-email")).await,
            Err(LedgerError::InvalidInput(_))
        ));
        assert_eq!(ledger.account_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn top_up_adds_to_balance() {
        let ledger = Ledger::new(MemoryStore::new());
        let id = ledger.create_account(input("a@example.com")).await.unwrap();

        assert_eq!(ledger.apply_delta(id, cents(1050)).await.unwrap(), cents(1050));
        assert_eq!(ledger.apply_delta(id, cents(25)).await.unwrap(), cents(1075));
        assert_eq!(ledger.get_balance(id).await.unwrap(), cents(1075));
    }

    #[tokio::test]
    async fn overdraw_is_rejected_and_balance_kept() {
        let ledger = Ledger::new(MemoryStore::new());
        let id = ledger.create_account(input("a@example.com")).await.unwrap();
        ledger.apply_delta(id, cents(30)).await.unwrap();

        let err = ledger.apply_delta(id, cents(-50)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds));
        assert_eq!(ledger.get_balance(id).await.unwrap(), cents(30));
    }

    #[tokio::test]
    async fn withdrawing_everything_reaches_zero() {
        let ledger = Ledger::new(MemoryStore::new());
        let id = ledger.create_account(input("a@example.com")).await.unwrap();
        ledger.apply_delta(id, cents(30)).await.unwrap();
        assert_eq!(ledger.apply_delta(id, cents(-30)).await.unwrap(), Amount::ZERO);
    }

    #[tokio::test]
    async fn overflow_is_invalid_amount() {
        let ledger = Ledger::new(MemoryStore::new());
        let id = ledger.create_account(input("a@example.com")).await.unwrap();
        ledger.apply_delta(id, cents(i64::MAX)).await.unwrap();

        let err = ledger.apply_delta(id, cents(1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(AmountError::OutOfRange)));
        assert_eq!(ledger.get_balance(id).await.unwrap(), cents(i64::MAX));
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let ledger = Ledger::new(MemoryStore::new());
        assert!(matches!(ledger.get_balance(42).await, Err(LedgerError::NotFound)));
        assert!(matches!(
            ledger.apply_delta(42, cents(100)).await,
            Err(LedgerError::NotFound)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_top_ups_are_all_applied() {
        for n in [10_i64, 1_000, 10_000] {
            let ledger = Arc::new(Ledger::new(MemoryStore::new()));
            let id = ledger.create_account(input("a@example.com")).await.unwrap();

            let tasks: Vec<_> = (0..n)
                .map(|_| {
                    let ledger = Arc::clone(&ledger);
                    tokio::spawn(async move { ledger.apply_delta(id, cents(1)).await })
                })
                .collect();
            for task in tasks {
                task.await.unwrap().unwrap();
            }

            assert_eq!(ledger.get_balance(id).await.unwrap(), cents(n));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn mixed_deltas_sum_to_accepted_ones() {
        let ledger = Arc::new(Ledger::new(MemoryStore::new()));
        let id = ledger.create_account(input("a@example.com")).await.unwrap();

        let tasks: Vec<_> = (0..2_000_i64)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                let delta = if i % 3 == 0 { cents(-7) } else { cents(5) };
                tokio::spawn(async move {
                    let result = ledger.apply_delta(id, delta).await;
                    if let Ok(balance) = result {
                        assert!(!balance.is_negative());
                    }
                    (delta, result)
                })
            })
            .collect();

        let mut accepted = 0_i64;
        for task in tasks {
            let (delta, result) = task.await.unwrap();
            match result {
                Ok(_) => accepted += delta.cents(),
                Err(LedgerError::InsufficientFunds) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(ledger.get_balance(id).await.unwrap(), cents(accepted));
    }
}
