//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Validates it and hands it to the ledger
//! 3. Returns HTTP response (JSON, status code)

use std::sync::Arc;

use crate::{services::ledger::Ledger, validation::Validator};

/// Service health endpoint
pub mod health;
/// Account endpoints
pub mod users;

/// State shared with every handler.
pub struct AppState<S> {
    pub ledger: Arc<Ledger<S>>,
    pub validator: Arc<Validator>,
}

impl<S> AppState<S> {
    pub fn new(ledger: Ledger<S>, validator: Validator) -> Self {
        Self {
            ledger: Arc::new(ledger),
            validator: Arc::new(validator),
        }
    }
}

// Manual impl: the store itself need not be Clone.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            validator: Arc::clone(&self.validator),
        }
    }
}
