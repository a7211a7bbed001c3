use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use booknet_auth_types::token::TokenError;

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("role not initialized")]
    RoleNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("invalid activation code")]
    ActivationCodeNotFound,
    #[error("activation code has expired; a new code has been sent to the same email address")]
    ActivationCodeExpired,
    #[error("activation code already used")]
    ActivationCodeAlreadyUsed,
    #[error("bad credentials")]
    BadCredentials,
    #[error("account disabled")]
    AccountDisabled,
    #[error("account locked")]
    AccountLocked,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("mail delivery failed")]
    Delivery(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::ActivationCodeNotFound => "ACTIVATION_CODE_NOT_FOUND",
            Self::ActivationCodeExpired => "ACTIVATION_CODE_EXPIRED",
            Self::ActivationCodeAlreadyUsed => "ACTIVATION_CODE_ALREADY_USED",
            Self::BadCredentials => "BAD_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::AccountLocked => "ACCOUNT_LOCKED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::Delivery(_) => "MAIL_DELIVERY_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UserNotFound | Self::ActivationCodeNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists | Self::ActivationCodeAlreadyUsed => StatusCode::CONFLICT,
            Self::ActivationCodeExpired => StatusCode::GONE,
            Self::BadCredentials | Self::InvalidToken | Self::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
            Self::AccountDisabled => StatusCode::FORBIDDEN,
            Self::AccountLocked => StatusCode::LOCKED,
            Self::Delivery(_) => StatusCode::BAD_GATEWAY,
            Self::RoleNotFound | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TokenError> for AuthServiceError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => Self::InvalidToken,
            TokenError::InvalidSignature => Self::InvalidSignature,
            other => Self::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // TraceLayer records every request; 4xx are expected client errors.
        // Server-side failures log their anyhow chain so the root cause is traceable.
        match &self {
            Self::Internal(e) | Self::Delivery(e) => {
                tracing::error!(error = %format!("{e:#}"), kind = self.kind(), "{self}");
            }
            Self::RoleNotFound => {
                tracing::error!(kind = self.kind(), "default role missing");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
