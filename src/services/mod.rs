//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.

/// Password hashing
pub mod credentials;
/// Serialized balance mutation
pub mod ledger;
/// Per-account serialization units
pub mod lock_registry;
