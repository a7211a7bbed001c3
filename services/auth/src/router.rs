use axum::{
    Router,
    routing::{get, post},
};

use booknet_core::error::not_found;
use booknet_core::health::healthz;
use booknet_core::middleware::with_request_tracing;

use crate::handlers::{
    account::{activate_account, register},
    health::readyz,
    token::{authenticate, check_token},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Account
        .route("/auth/register", post(register))
        .route("/auth/activate-account", get(activate_account))
        // Token
        .route("/auth/authenticate", post(authenticate))
        .route("/auth/token", get(check_token))
        .fallback(not_found)
        .with_state(state);
    with_request_tracing(router)
}
