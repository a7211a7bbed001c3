use booknet_auth_types::token::{ClaimValue, ExtraClaims, FULL_NAME_CLAIM, JwtService};
use tracing::info;

use crate::domain::repository::Authenticator;
use crate::domain::types::credential_violations;
use crate::error::AuthServiceError;

pub struct AuthenticateInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct AuthenticateOutput {
    pub token: String,
}

pub struct AuthenticateUseCase<A: Authenticator> {
    pub authenticator: A,
    pub jwt: JwtService,
}

impl<A: Authenticator> AuthenticateUseCase<A> {
    pub async fn execute(
        &self,
        input: AuthenticateInput,
    ) -> Result<AuthenticateOutput, AuthServiceError> {
        let violations = credential_violations(&input.email, &input.password);
        if !violations.is_empty() {
            return Err(AuthServiceError::Validation(violations.join("; ")));
        }

        let user = self
            .authenticator
            .authenticate(input.email.trim(), &input.password)
            .await?;

        let claims = ExtraClaims::from([(
            FULL_NAME_CLAIM.to_owned(),
            ClaimValue::from(user.full_name()),
        )]);
        let token = self.jwt.issue_token(&user, claims)?;
        info!(user_id = %user.id, "user authenticated");

        Ok(AuthenticateOutput { token })
    }
}
