use std::time::Duration;

use booknet_core::config::{env_or, env_required};

/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Base64-encoded HMAC secret for signing JWTs. Env var: `JWT_SECRET_KEY`.
    pub jwt_secret_key: String,
    /// Token lifetime. Env var: `JWT_EXPIRATION_MS` (default one day).
    pub jwt_expiration: Duration,
    /// Frontend URL placed in the activation mail.
    pub activation_url: String,
    /// Mail relay endpoint receiving templated mail as JSON.
    pub mail_relay_url: String,
    /// Register accounts disabled until activated (default false).
    pub require_activation: bool,
    /// TCP port to listen on (default 8088). Env var: `AUTH_PORT`.
    pub auth_port: u16,
}

impl AuthConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env_required("DATABASE_URL")?,
            jwt_secret_key: env_required("JWT_SECRET_KEY")?,
            jwt_expiration: Duration::from_millis(env_or("JWT_EXPIRATION_MS", 86_400_000_u64)?),
            activation_url: env_required("ACTIVATION_URL")?,
            mail_relay_url: env_required("MAIL_RELAY_URL")?,
            require_activation: env_or("REQUIRE_ACTIVATION", false)?,
            auth_port: env_or("AUTH_PORT", 8088)?,
        })
    }
}
