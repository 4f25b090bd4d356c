//! Account balance service.
//!
//! REST API for creating accounts, reading balances and topping them up.
//! All balance changes go through the [`services::ledger::Ledger`], which
//! serializes mutations per account so concurrent requests never lose or
//! double-apply an update and never drive a balance below zero.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: PostgreSQL with sqlx, or an in-memory store when no database is configured
//! - **Format**: JSON requests/responses

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod validation;
