use chrono::{DateTime, Utc};

use booknet_auth_types::token::{JwtService, TokenSubject};

use crate::domain::repository::UserRepository;
use crate::error::AuthServiceError;

/// Identity behind a presented bearer token.
#[derive(Debug)]
pub struct CheckTokenOutput {
    pub username: String,
    pub authorities: Vec<String>,
    pub full_name: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// Request-filter flow: read the subject, load the account, then require the
/// token to be valid for that account.
pub struct CheckTokenUseCase<U: UserRepository> {
    pub users: U,
    pub jwt: JwtService,
}

impl<U: UserRepository> CheckTokenUseCase<U> {
    pub async fn execute(&self, token: &str) -> Result<CheckTokenOutput, AuthServiceError> {
        let username = self.jwt.extract_username(token)?;

        let user = self
            .users
            .find_by_email(&username)
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;

        if !self.jwt.is_token_valid(token, user.username())? {
            return Err(AuthServiceError::InvalidToken);
        }

        let claims = self.jwt.extract_all_claims(token)?;
        let expires_at = claims.expires_at().ok_or(AuthServiceError::InvalidToken)?;
        Ok(CheckTokenOutput {
            username: claims.sub.clone(),
            authorities: claims.authorities.clone(),
            full_name: claims.full_name().map(str::to_owned),
            expires_at,
        })
    }
}
