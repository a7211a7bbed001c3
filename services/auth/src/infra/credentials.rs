use tracing::debug;

use crate::domain::repository::{Authenticator, PasswordEncoder, UserRepository};
use crate::domain::types::User;
use crate::error::AuthServiceError;

/// Email + password check against stored accounts.
///
/// The password is verified before account status, so a wrong password
/// never reveals whether the account is locked or disabled.
pub struct PasswordAuthenticator<U, P>
where
    U: UserRepository,
    P: PasswordEncoder,
{
    pub users: U,
    pub passwords: P,
}

impl<U, P> Authenticator for PasswordAuthenticator<U, P>
where
    U: UserRepository,
    P: PasswordEncoder,
{
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthServiceError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            debug!("authentication failed: unknown email");
            return Err(AuthServiceError::BadCredentials);
        };

        if !self.passwords.matches(password, &user.password)? {
            debug!(user_id = %user.id, "authentication failed: password mismatch");
            return Err(AuthServiceError::BadCredentials);
        }

        if user.account_locked {
            return Err(AuthServiceError::AccountLocked);
        }
        if !user.enabled {
            return Err(AuthServiceError::AccountDisabled);
        }
        Ok(user)
    }
}
