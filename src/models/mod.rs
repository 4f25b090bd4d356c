//! Data models shared by the store, the ledger and the HTTP layer.

/// Account record and request bodies
pub mod account;
/// Fixed-point money amounts
pub mod amount;
