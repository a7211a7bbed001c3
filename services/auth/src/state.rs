use sea_orm::DatabaseConnection;

use booknet_auth_types::token::JwtService;

use crate::infra::credentials::PasswordAuthenticator;
use crate::infra::db::{DbActivationTokenRepository, DbRoleRepository, DbUserRepository};
use crate::infra::mail::HttpMailer;
use crate::infra::password::Argon2PasswordEncoder;
use crate::usecase::activation::ActivationIssuer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: JwtService,
    pub mailer: HttpMailer,
    /// Frontend page the activation mail links to.
    pub activation_url: String,
    pub require_activation: bool,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn role_repo(&self) -> DbRoleRepository {
        DbRoleRepository {
            db: self.db.clone(),
        }
    }

    pub fn activation_token_repo(&self) -> DbActivationTokenRepository {
        DbActivationTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn activation_issuer(&self) -> ActivationIssuer<DbActivationTokenRepository, HttpMailer> {
        ActivationIssuer {
            tokens: self.activation_token_repo(),
            mailer: self.mailer.clone(),
            activation_url: self.activation_url.clone(),
        }
    }

    pub fn authenticator(&self) -> PasswordAuthenticator<DbUserRepository, Argon2PasswordEncoder> {
        PasswordAuthenticator {
            users: self.user_repo(),
            passwords: Argon2PasswordEncoder,
        }
    }
}
