use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use booknet_auth_types::bearer::BearerToken;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::authenticate::{AuthenticateInput, AuthenticateUseCase};
use crate::usecase::token::CheckTokenUseCase;

// ── POST /auth/authenticate ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AuthenticateRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthenticateResponse {
    pub token: String,
}

pub async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<AuthenticateRequest>,
) -> Result<Json<AuthenticateResponse>, AuthServiceError> {
    let usecase = AuthenticateUseCase {
        authenticator: state.authenticator(),
        jwt: state.jwt.clone(),
    };
    let out = usecase
        .execute(AuthenticateInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(AuthenticateResponse { token: out.token }))
}

// ── GET /auth/token ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CheckTokenResponse {
    pub username: String,
    pub authorities: Vec<String>,
    pub full_name: Option<String>,
    #[serde(serialize_with = "booknet_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

pub async fn check_token(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<CheckTokenResponse>, AuthServiceError> {
    let usecase = CheckTokenUseCase {
        users: state.user_repo(),
        jwt: state.jwt.clone(),
    };
    let out = usecase.execute(&token).await?;
    Ok(Json(CheckTokenResponse {
        username: out.username,
        authorities: out.authorities,
        full_name: out.full_name,
        expires_at: out.expires_at,
    }))
}
