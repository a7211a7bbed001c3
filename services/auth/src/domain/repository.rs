#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{ActivationOutcome, ActivationToken, Role, TemplatedEmail, User};
use crate::error::AuthServiceError;

/// Account storage.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError>;

    /// Insert the user together with its role links.
    /// A duplicate email fails with [`AuthServiceError::UserAlreadyExists`].
    async fn create(&self, user: &User) -> Result<(), AuthServiceError>;
}

pub trait RoleRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthServiceError>;
}

/// Storage for activation codes.
pub trait ActivationTokenRepository: Send + Sync {
    async fn create(&self, token: &ActivationToken) -> Result<(), AuthServiceError>;

    /// Most recently created token carrying `code`.
    async fn find_by_code(&self, code: &str) -> Result<Option<ActivationToken>, AuthServiceError>;

    /// Whether any token, expired or consumed included, already uses `code`.
    async fn is_code_taken(&self, code: &str) -> Result<bool, AuthServiceError>;

    /// Enable the owning user and stamp `validated_at = now` as one atomic unit.
    ///
    /// Implementations lock the token, re-check that it is still unvalidated
    /// and roll back on any failure.
    async fn activate(
        &self,
        token_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ActivationOutcome, AuthServiceError>;
}

/// One-way password encoding.
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw: &str) -> Result<String, AuthServiceError>;

    fn matches(&self, raw: &str, encoded: &str) -> Result<bool, AuthServiceError>;
}

/// Outbound templated mail. Failures surface as [`AuthServiceError::Delivery`].
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &TemplatedEmail) -> Result<(), AuthServiceError>;
}

/// Credential check: email + password in, authenticated principal out.
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthServiceError>;
}
