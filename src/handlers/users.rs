//! Account HTTP handlers.
//!
//! This module implements the user-facing endpoints:
//! - POST /users - Create an account
//! - GET /users/balance/{id} - Read an account's balance
//! - POST /users/topup - Add funds to an account
//!
//! Mutations run in their own task, so a client that disconnects or hits the
//! request timeout does not cancel a mutation that already started.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde_json::{Value, json};

use super::AppState;
use crate::{
    error::AppError,
    models::account::{AccountId, CreateUserRequest, TopUpRequest},
    store::AccountStore,
};

/// Create a new account.
///
/// # Request Body
///
/// ```json
/// { "name": "Ada", "email": "ada@example.com", "password": "secret" }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: `{"success": true}`
/// - **Error (400)**: malformed body, field violations, or duplicate email
pub async fn create_user<S: AccountStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let input = state
        .validator
        .validate_create_user(request)
        .map_err(AppError::Validation)?;

    let ledger = Arc::clone(&state.ledger);
    tokio::spawn(async move { ledger.create_account(input).await }).await??;

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

/// Read the balance of an account.
///
/// # Response
///
/// - **Success (200 OK)**: the balance as a two-place decimal, e.g. `10.50`
/// - **Error (400)**: unknown account or non-numeric id
pub async fn get_balance<S: AccountStore>(
    State(state): State<AppState<S>>,
    id: Result<Path<AccountId>, PathRejection>,
) -> Result<String, AppError> {
    let Path(id) = id.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let balance = state.ledger.get_balance(id).await?;
    Ok(balance.to_string())
}

/// Add funds to an account.
///
/// # Request Body
///
/// ```json
/// { "id": 1, "amount": 10.50 }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: empty body
/// - **Error (400)**: malformed body, field violations, or unknown account
pub async fn top_up<S: AccountStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<TopUpRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let input = state
        .validator
        .validate_top_up(request)
        .map_err(AppError::Validation)?;

    let ledger = Arc::clone(&state.ledger);
    let balance = tokio::spawn(async move { ledger.apply_delta(input.id, input.delta).await })
        .await??;
    tracing::debug!(account_id = input.id, %balance, "balance topped up");

    Ok(StatusCode::OK)
}
