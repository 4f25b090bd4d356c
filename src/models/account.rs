//! Account data models and API request types.
//!
//! This module defines:
//! - `Account`: the stored account record
//! - `NewAccount`: the record handed to a store for insertion
//! - `CreateUserRequest` / `TopUpRequest`: raw request bodies, before validation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::amount::Amount;

/// Identifier assigned by the store when an account is inserted.
///
/// Always positive and never reused.
pub type AccountId = i64;

/// Represents an account record.
///
/// # Database Table
///
/// Maps to the `users` table.
///
/// # Balance Storage
///
/// Balances are stored as `i64` cents to avoid floating-point precision issues.
/// Must be >= 0 (enforced by the ledger, and by a CHECK constraint in Postgres).
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Account {
    pub id: AccountId,

    /// Display name of the account holder
    pub name: String,

    /// Unique across all accounts
    pub email: String,

    /// Salted password digest, never the password itself
    pub credential_hash: String,

    /// Current balance in cents
    pub balance_cents: i64,

    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn balance(&self) -> Amount {
        Amount::from_cents(self.balance_cents)
    }
}

/// An account that has not been assigned an id yet.
///
/// Stores insert it with a zero balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub credential_hash: String,
}

/// Request body for `POST /users`.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Ada",
///   "email": "ada@example.com",
///   "password": "secret"
/// }
/// ```
///
/// Every field is optional at the decoding step so that missing fields are
/// reported by the validator alongside the other violations.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /users/topup`.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "amount": 10.50
/// }
/// ```
///
/// `amount` is decoded from the exact digits of the JSON number, so extra
/// decimal places are seen by the validator instead of being rounded away.
#[derive(Debug, Default, Deserialize)]
pub struct TopUpRequest {
    pub id: Option<AccountId>,
    pub amount: Option<Decimal>,
}
