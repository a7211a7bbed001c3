//! `Authorization: Bearer <token>` extractor.

use axum::extract::FromRequestParts;
use http::header::AUTHORIZATION;
use http::request::Parts;

use booknet_core::error::AppError;

/// Raw bearer token taken from the `Authorization` header.
///
/// Only presence is checked here; callers verify it with
/// [`JwtService`](crate::token::JwtService). Rejects with 401 when the header
/// is absent, not UTF-8, uses another scheme, or carries an empty token.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // Read the header synchronously and return a 'static future, so the
    // returned future does not capture `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_bearer)
            .map(str::to_owned);

        async move { token.map(BearerToken).ok_or(AppError::Unauthorized) }
    }
}
