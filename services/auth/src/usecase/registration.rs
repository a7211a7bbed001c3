use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::repository::{
    ActivationTokenRepository, Mailer, PasswordEncoder, RoleRepository, UserRepository,
};
use crate::domain::types::{DEFAULT_ROLE, User, registration_violations};
use crate::error::AuthServiceError;
use crate::usecase::activation::ActivationIssuer;

pub struct RegisterInput {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterUseCase<U, R, P, T, M>
where
    U: UserRepository,
    R: RoleRepository,
    P: PasswordEncoder,
    T: ActivationTokenRepository,
    M: Mailer,
{
    pub users: U,
    pub roles: R,
    pub passwords: P,
    pub issuer: ActivationIssuer<T, M>,
    /// Create accounts disabled until the activation code is redeemed.
    pub require_activation: bool,
}

impl<U, R, P, T, M> RegisterUseCase<U, R, P, T, M>
where
    U: UserRepository,
    R: RoleRepository,
    P: PasswordEncoder,
    T: ActivationTokenRepository,
    M: Mailer,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<User, AuthServiceError> {
        let violations = registration_violations(
            &input.firstname,
            &input.lastname,
            &input.email,
            &input.password,
        );
        if !violations.is_empty() {
            return Err(AuthServiceError::Validation(violations.join("; ")));
        }

        let role = self
            .roles
            .find_by_name(DEFAULT_ROLE)
            .await?
            .ok_or(AuthServiceError::RoleNotFound)?;

        let email = input.email.trim().to_owned();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::UserAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            firstname: input.firstname.trim().to_owned(),
            lastname: input.lastname.trim().to_owned(),
            email,
            password: self.passwords.encode(&input.password)?,
            account_locked: false,
            enabled: !self.require_activation,
            roles: vec![role],
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        info!(user_id = %user.id, enabled = user.enabled, "user registered");

        self.issuer.send_activation(&user).await?;
        Ok(user)
    }
}
