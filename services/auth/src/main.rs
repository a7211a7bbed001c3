use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use booknet_auth::config::AuthConfig;
use booknet_auth::infra::mail::HttpMailer;
use booknet_auth::router::build_router;
use booknet_auth::state::AppState;
use booknet_auth_migration::{Migrator, MigratorTrait};
use booknet_auth_types::token::JwtService;
use booknet_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = AuthConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    let jwt = JwtService::from_base64_secret(&config.jwt_secret_key, config.jwt_expiration)
        .context("invalid JWT_SECRET_KEY")?;
    let mailer = HttpMailer::new(config.mail_relay_url)?;

    let state = AppState {
        db,
        jwt,
        mailer,
        activation_url: config.activation_url,
        require_activation: config.require_activation,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
