use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::error::AuthServiceError;
use crate::infra::password::Argon2PasswordEncoder;
use crate::state::AppState;
use crate::usecase::activation::ActivateAccountUseCase;
use crate::usecase::registration::{RegisterInput, RegisterUseCase};

// ── POST /auth/register ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        passwords: Argon2PasswordEncoder,
        issuer: state.activation_issuer(),
        require_activation: state.require_activation,
    };
    usecase
        .execute(RegisterInput {
            firstname: body.firstname,
            lastname: body.lastname,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(StatusCode::ACCEPTED)
}

// ── GET /auth/activate-account ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ActivateQuery {
    #[serde(default)]
    pub token: String,
}

pub async fn activate_account(
    State(state): State<AppState>,
    Query(query): Query<ActivateQuery>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = ActivateAccountUseCase {
        users: state.user_repo(),
        issuer: state.activation_issuer(),
    };
    usecase.execute(&query.token).await?;
    Ok(StatusCode::OK)
}
