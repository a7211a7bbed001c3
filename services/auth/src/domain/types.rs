use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use booknet_auth_types::token::TokenSubject;

/// Registered account as seen by the auth service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    /// Encoded password (PHC string).
    pub password: String,
    pub account_locked: bool,
    pub enabled: bool,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

impl TokenSubject for User {
    fn username(&self) -> &str {
        &self.email
    }

    fn authorities(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.name.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i32,
    pub name: String,
}

/// Numeric code proving control of the account's email address.
#[derive(Debug, Clone)]
pub struct ActivationToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
    pub validated_at: Option<DateTime<Utc>>,
}

impl ActivationToken {
    pub fn new(user_id: Uuid, code: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            code,
            created_at: now,
            expired_at: now + Duration::minutes(ACTIVATION_CODE_TTL_MINS),
            validated_at: None,
        }
    }

    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expired_at
    }
}

/// Result of the transactional activation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// User enabled and token stamped in one commit.
    Activated,
    /// Another request consumed the token first; nothing changed.
    AlreadyActivated,
    /// The token's owner no longer exists; nothing changed.
    UserMissing,
    /// The token row itself is gone; nothing changed.
    TokenMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailTemplate {
    ActivateAccount,
}

/// Mail handed to the delivery collaborator; rendering happens on its side.
#[derive(Debug, Clone, Serialize)]
pub struct TemplatedEmail {
    pub to: String,
    pub username: String,
    pub template: EmailTemplate,
    pub confirmation_url: String,
    pub activation_code: String,
    pub subject: String,
}

/// Activation code length in digits.
pub const ACTIVATION_CODE_LEN: usize = 6;

/// Activation code time-to-live in minutes.
pub const ACTIVATION_CODE_TTL_MINS: i64 = 15;

/// Attempts at drawing a code that no stored token already uses.
pub const ACTIVATION_CODE_MAX_DRAWS: usize = 5;

pub const ACTIVATION_EMAIL_SUBJECT: &str = "Account activation";

/// Role granted to every new account.
pub const DEFAULT_ROLE: &str = "USER";

pub const MIN_PASSWORD_LEN: usize = 8;

/// Loose `local@domain` shape check; delivery is the real proof.
pub fn is_well_formed_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Violations for a login attempt, empty when acceptable.
/// Surrounding whitespace on the email is ignored, as the stored address is trimmed.
pub fn credential_violations(email: &str, password: &str) -> Vec<&'static str> {
    let email = email.trim();
    let mut violations = Vec::new();
    if email.is_empty() {
        violations.push("email is mandatory");
    } else if !is_well_formed_email(email) {
        violations.push("email is not well formed");
    }
    if password.trim().is_empty() {
        violations.push("password is mandatory");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        violations.push("password should be 8 characters long minimum");
    }
    violations
}

/// Violations for a registration request, empty when acceptable.
pub fn registration_violations(
    firstname: &str,
    lastname: &str,
    email: &str,
    password: &str,
) -> Vec<&'static str> {
    let mut violations = Vec::new();
    if firstname.trim().is_empty() {
        violations.push("firstname is mandatory");
    }
    if lastname.trim().is_empty() {
        violations.push("lastname is mandatory");
    }
    violations.extend(credential_violations(email, password));
    violations
}
