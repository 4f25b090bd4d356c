//! HTTP router assembly.

use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{self, AppState},
    store::AccountStore,
};

/// Build the application router.
///
/// # Routes
///
/// - `GET /health`
/// - `POST /users`
/// - `GET /users/balance/{id}`
/// - `POST /users/topup`
///
/// Requests that take longer than `request_timeout` get a 408 response; a
/// mutation already handed to the ledger still completes.
pub fn router<S: AccountStore>(state: AppState<S>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check::<S>))
        .route("/users", post(handlers::users::create_user::<S>))
        .route(
            "/users/balance/{id}",
            get(handlers::users::get_balance::<S>),
        )
        .route("/users/topup", post(handlers::users::top_up::<S>))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        // Distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
