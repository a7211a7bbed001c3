use chrono::Utc;
use rand::RngExt;
use tracing::{info, warn};

use crate::domain::repository::{ActivationTokenRepository, Mailer, UserRepository};
use crate::domain::types::{
    ACTIVATION_CODE_LEN, ACTIVATION_CODE_MAX_DRAWS, ACTIVATION_EMAIL_SUBJECT, ActivationOutcome,
    ActivationToken, EmailTemplate, TemplatedEmail, User,
};
use crate::error::AuthServiceError;

const DIGITS: &[u8] = b"0123456789";

/// Six independent uniform digit draws; leading zeros are kept.
pub fn generate_activation_code() -> String {
    let mut rng = rand::rng();
    (0..ACTIVATION_CODE_LEN)
        .map(|_| DIGITS[rng.random_range(0..DIGITS.len())] as char)
        .collect()
}

/// Creates activation codes and mails them out.
pub struct ActivationIssuer<T, M>
where
    T: ActivationTokenRepository,
    M: Mailer,
{
    pub tokens: T,
    pub mailer: M,
    pub activation_url: String,
}

impl<T, M> ActivationIssuer<T, M>
where
    T: ActivationTokenRepository,
    M: Mailer,
{
    /// Persist a fresh code for `user` and return it. Delivery is the caller's job.
    pub async fn issue(&self, user: &User) -> Result<String, AuthServiceError> {
        self.issue_with(user, generate_activation_code).await
    }

    /// [`issue`](Self::issue) with the code source supplied by the caller.
    pub async fn issue_with<F>(&self, user: &User, draw: F) -> Result<String, AuthServiceError>
    where
        F: FnMut() -> String,
    {
        let code = self.draw_free_code(draw).await?;
        let token = ActivationToken::new(user.id, code.clone(), Utc::now());
        self.tokens.create(&token).await?;
        Ok(code)
    }

    // Codes are looked up by value alone: never reuse one a stored token holds.
    async fn draw_free_code<F>(&self, mut draw: F) -> Result<String, AuthServiceError>
    where
        F: FnMut() -> String,
    {
        for _ in 0..ACTIVATION_CODE_MAX_DRAWS {
            let code = draw();
            if !self.tokens.is_code_taken(&code).await? {
                return Ok(code);
            }
        }
        Err(anyhow::anyhow!(
            "no free activation code after {ACTIVATION_CODE_MAX_DRAWS} draws"
        )
        .into())
    }

    /// Issue a code and mail it to the user.
    pub async fn send_activation(&self, user: &User) -> Result<(), AuthServiceError> {
        let code = self.issue(user).await?;
        let email = TemplatedEmail {
            to: user.email.clone(),
            username: user.full_name(),
            template: EmailTemplate::ActivateAccount,
            confirmation_url: self.activation_url.clone(),
            activation_code: code,
            subject: ACTIVATION_EMAIL_SUBJECT.to_owned(),
        };
        self.mailer.send(&email).await?;
        info!(user_id = %user.id, "activation code sent");
        Ok(())
    }
}

// ── ActivateAccount ──────────────────────────────────────────────────────────

pub struct ActivateAccountUseCase<U, T, M>
where
    U: UserRepository,
    T: ActivationTokenRepository,
    M: Mailer,
{
    pub users: U,
    pub issuer: ActivationIssuer<T, M>,
}

impl<U, T, M> ActivateAccountUseCase<U, T, M>
where
    U: UserRepository,
    T: ActivationTokenRepository,
    M: Mailer,
{
    /// Validate `code` and enable its owner.
    ///
    /// An expired code triggers a fresh code mailed to the same user *and*
    /// still fails with [`AuthServiceError::ActivationCodeExpired`].
    pub async fn execute(&self, code: &str) -> Result<(), AuthServiceError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthServiceError::Validation(
                "activation code is mandatory".to_owned(),
            ));
        }

        let token = self
            .issuer
            .tokens
            .find_by_code(code)
            .await?
            .ok_or(AuthServiceError::ActivationCodeNotFound)?;

        if token.is_validated() {
            return Err(AuthServiceError::ActivationCodeAlreadyUsed);
        }

        let now = Utc::now();
        if token.is_expired_at(now) {
            let user = self
                .users
                .find_by_id(token.user_id)
                .await?
                .ok_or(AuthServiceError::UserNotFound)?;
            warn!(user_id = %user.id, "activation code expired, sending a new one");
            self.issuer.send_activation(&user).await?;
            return Err(AuthServiceError::ActivationCodeExpired);
        }

        match self.issuer.tokens.activate(token.id, now).await? {
            ActivationOutcome::Activated => {
                info!(user_id = %token.user_id, "account activated");
                Ok(())
            }
            ActivationOutcome::AlreadyActivated => Err(AuthServiceError::ActivationCodeAlreadyUsed),
            ActivationOutcome::UserMissing => Err(AuthServiceError::UserNotFound),
            ActivationOutcome::TokenMissing => Err(AuthServiceError::ActivationCodeNotFound),
        }
    }
}
