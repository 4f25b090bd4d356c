//! Error types and HTTP error response handling.
//!
//! This module defines the errors a handler can return and how they are
//! converted into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

use crate::{services::ledger::LedgerError, validation::FieldViolation};

/// Application-wide error type.
///
/// Every failure path of a handler ends in exactly one of these, and so in
/// exactly one response.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Body could not be decoded or the path could not be parsed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// One or more fields broke a validation rule.
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    /// The ledger refused or failed the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The task running a mutation panicked or was aborted.
    #[error("Mutation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// Validation failures return a flat object of field to message:
/// ```json
/// { "email": "Field 'email' email validation failed" }
/// ```
///
/// Everything else returns:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// Client-side failures (including unknown accounts, duplicate emails and
/// insufficient funds) are all 400 Bad Request. Storage faults and failed
/// tasks are 500 and hide their details.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Validation(violations) => {
                let fields: Map<String, Value> = violations
                    .iter()
                    .map(|v| (v.field.to_string(), Value::String(v.to_string())))
                    .collect();
                return (StatusCode::BAD_REQUEST, Json(Value::Object(fields))).into_response();
            }
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Ledger(ref err) => match err {
                LedgerError::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, "invalid_input", msg.clone())
                }
                LedgerError::DuplicateEmail => {
                    (StatusCode::BAD_REQUEST, "duplicate_email", err.to_string())
                }
                LedgerError::NotFound => (StatusCode::BAD_REQUEST, "not_found", err.to_string()),
                LedgerError::InvalidAmount(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_amount", err.to_string())
                }
                LedgerError::InsufficientFunds => (
                    StatusCode::BAD_REQUEST,
                    "insufficient_funds",
                    err.to_string(),
                ),
                LedgerError::Internal(source) => {
                    tracing::error!(error = %source, "store failure");
                    internal()
                }
            },
            AppError::Task(ref err) => {
                tracing::error!(error = %err, "mutation task failed");
                internal()
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "An internal error occurred".to_string(),
    )
}
