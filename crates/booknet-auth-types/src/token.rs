//! HMAC-signed JWT verification and issuance.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;
use tracing::debug;

/// Claim carrying the granted authority strings.
pub const AUTHORITIES_CLAIM: &str = "authorities";

/// Claim carrying the user's display name.
pub const FULL_NAME_CLAIM: &str = "fullName";

/// Keys owned by [`Claims`] itself; extra claims with these names are dropped on issue.
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
const RESERVED_CLAIMS: [&str; 4] = ["sub", "iat", "exp", AUTHORITIES_CLAIM];

/// Errors returned by [`JwtService`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("signing secret is not valid base64")]
    InvalidSecret,
    #[error("signing key too weak: {bits} bits, at least 256 required")]
    WeakKey { bits: usize },
    #[error("token lifetime out of range")]
    InvalidExpiration,
    #[error("failed to sign token")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

/// Value of a custom (non-registered) claim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
#[serde(untagged)]
pub enum ClaimValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ClaimValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Custom claims keyed by name, serialized alongside the registered ones.
pub type ExtraClaims = BTreeMap<String, ClaimValue>;

/// JWT payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | username (the account email) |
/// | `iat` | `iat` | issued at, seconds since epoch |
/// | `exp` | `exp` | expires at, seconds since epoch |
/// | `authorities` | `authorities` | granted role names, in order |
/// | `extra` | any other key | e.g. `fullName` |
///
/// [`Serialize`] requires the **`USE_ONLY_IN_AUTH_SERVICE`** feature: only the
/// auth service signs tokens.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default)]
    pub authorities: Vec<String>,
    #[serde(flatten)]
    pub extra: ExtraClaims,
}

impl Claims {
    pub fn full_name(&self) -> Option<&str> {
        self.extra.get(FULL_NAME_CLAIM).and_then(ClaimValue::as_str)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is live only while its expiry lies strictly after `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(exp) => exp <= now,
            None => true,
        }
    }
}

/// Something a token can be issued for.
pub trait TokenSubject {
    /// Unique identifier stored in `sub`.
    fn username(&self) -> &str;
    /// Authority strings stored in the `authorities` claim.
    fn authorities(&self) -> Vec<String>;
}

/// Pick the HMAC variant the key is strong enough for.
fn algorithm_for_key(key: &[u8]) -> Result<Algorithm, TokenError> {
    match key.len() {
        n if n >= 64 => Ok(Algorithm::HS512),
        n if n >= 48 => Ok(Algorithm::HS384),
        n if n >= 32 => Ok(Algorithm::HS256),
        n => Err(TokenError::WeakKey { bits: n * 8 }),
    }
}

/// Issues and verifies HMAC-signed bearer tokens.
///
/// Signature and structure are verified on every read; expiry is checked
/// separately by [`JwtService::is_token_valid`] so expired tokens can still be
/// inspected.
#[derive(Clone)]
pub struct JwtService {
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    #[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
    encoding_key: EncodingKey,
    validation: Validation,
    expiration: TimeDelta,
}

impl JwtService {
    /// Build from a base64-encoded secret and the token lifetime.
    pub fn from_base64_secret(secret: &str, expiration: Duration) -> Result<Self, TokenError> {
        let key = STANDARD
            .decode(secret.trim())
            .map_err(|_| TokenError::InvalidSecret)?;
        let algorithm = algorithm_for_key(&key)?;
        let expiration =
            TimeDelta::from_std(expiration).map_err(|_| TokenError::InvalidExpiration)?;

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            algorithm,
            decoding_key: DecodingKey::from_secret(&key),
            #[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
            encoding_key: EncodingKey::from_secret(&key),
            validation,
            expiration,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn expiration(&self) -> TimeDelta {
        self.expiration
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => {
                    debug!(error = %e, "rejected malformed token");
                    TokenError::Malformed
                }
            })
    }

    /// Verify `token` and apply `selector` to its claims.
    ///
    /// Every claim read goes through here, so nothing is ever read from an
    /// unverified token.
    pub fn extract_claim<T>(
        &self,
        token: &str,
        selector: impl FnOnce(&Claims) -> T,
    ) -> Result<T, TokenError> {
        let claims = self.decode_claims(token)?;
        Ok(selector(&claims))
    }

    pub fn extract_all_claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.extract_claim(token, Claims::clone)
    }

    pub fn extract_username(&self, token: &str) -> Result<String, TokenError> {
        self.extract_claim(token, |c| c.sub.clone())
    }

    pub fn extract_expiration(&self, token: &str) -> Result<DateTime<Utc>, TokenError> {
        self.extract_claim(token, Claims::expires_at)?
            .ok_or(TokenError::Malformed)
    }

    /// `Ok(true)` iff the token verifies, is unexpired and belongs to `username`.
    ///
    /// Verification failures are errors, not `Ok(false)`.
    pub fn is_token_valid(&self, token: &str, username: &str) -> Result<bool, TokenError> {
        self.is_token_valid_at(token, username, Utc::now())
    }

    pub fn is_token_valid_at(
        &self,
        token: &str,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, TokenError> {
        let valid = self.extract_claim(token, |c| !c.is_expired_at(now) && c.sub == username)?;
        debug!(username, valid, "token validation result");
        Ok(valid)
    }
}

// ── Feature-gated: auth service only ─────────────────────────────────────

#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
impl JwtService {
    /// Issue a token for `subject` expiring after the configured lifetime.
    pub fn issue_token<S>(&self, subject: &S, extra: ExtraClaims) -> Result<String, TokenError>
    where
        S: TokenSubject + ?Sized,
    {
        self.issue_token_at(subject, extra, Utc::now())
    }

    pub fn issue_token_at<S>(
        &self,
        subject: &S,
        mut extra: ExtraClaims,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError>
    where
        S: TokenSubject + ?Sized,
    {
        for key in RESERVED_CLAIMS {
            extra.remove(key);
        }
        let claims = Claims {
            sub: subject.username().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.expiration).timestamp(),
            authorities: subject.authorities(),
            extra,
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(TokenError::Encoding)?;
        debug!(username = %claims.sub, exp = claims.exp, "issued token");
        Ok(token)
    }
}
