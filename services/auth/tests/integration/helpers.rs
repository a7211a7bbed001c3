use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use booknet_auth::domain::repository::{
    ActivationTokenRepository, Mailer, PasswordEncoder, RoleRepository, UserRepository,
};
use booknet_auth::domain::types::{
    ActivationOutcome, ActivationToken, DEFAULT_ROLE, Role, TemplatedEmail, User,
};
use booknet_auth::error::AuthServiceError;
use booknet_auth::usecase::activation::ActivationIssuer;
use booknet_auth_types::token::JwtService;

pub type Shared<T> = Arc<Mutex<Vec<T>>>;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub users: Shared<User>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shares the same user list; token activation writes through it.
    pub fn handle(&self) -> Shared<User> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthServiceError::UserAlreadyExists);
        }
        users.push(user.clone());
        Ok(())
    }
}

// ── MockRoleRepo ─────────────────────────────────────────────────────────────

pub struct MockRoleRepo {
    pub roles: Vec<Role>,
}

impl MockRoleRepo {
    pub fn seeded() -> Self {
        Self {
            roles: vec![user_role()],
        }
    }

    pub fn empty() -> Self {
        Self { roles: vec![] }
    }
}

impl RoleRepository for MockRoleRepo {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthServiceError> {
        Ok(self.roles.iter().find(|r| r.name == name).cloned())
    }
}

// ── MockActivationTokenRepo ──────────────────────────────────────────────────

pub struct MockActivationTokenRepo {
    pub tokens: Shared<ActivationToken>,
    users: Shared<User>,
}

impl MockActivationTokenRepo {
    pub fn new(tokens: Vec<ActivationToken>, users: Shared<User>) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(tokens)),
            users,
        }
    }

    pub fn handle(&self) -> Shared<ActivationToken> {
        Arc::clone(&self.tokens)
    }
}

impl ActivationTokenRepository for MockActivationTokenRepo {
    async fn create(&self, token: &ActivationToken) -> Result<(), AuthServiceError> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ActivationToken>, AuthServiceError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.code == code)
            .max_by_key(|t| t.created_at)
            .cloned())
    }

    async fn is_code_taken(&self, code: &str) -> Result<bool, AuthServiceError> {
        Ok(self.tokens.lock().unwrap().iter().any(|t| t.code == code))
    }

    async fn activate(
        &self,
        token_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ActivationOutcome, AuthServiceError> {
        let mut tokens = self.tokens.lock().unwrap();
        let Some(token) = tokens.iter_mut().find(|t| t.id == token_id) else {
            return Ok(ActivationOutcome::TokenMissing);
        };
        if token.is_validated() {
            return Ok(ActivationOutcome::AlreadyActivated);
        }
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == token.user_id) else {
            return Ok(ActivationOutcome::UserMissing);
        };
        user.enabled = true;
        user.updated_at = now;
        token.validated_at = Some(now);
        Ok(ActivationOutcome::Activated)
    }
}

// ── RecordingMailer ──────────────────────────────────────────────────────────

pub struct RecordingMailer {
    pub sent: Shared<TemplatedEmail>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn handle(&self) -> Shared<TemplatedEmail> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, email: &TemplatedEmail) -> Result<(), AuthServiceError> {
        if self.fail {
            return Err(AuthServiceError::Delivery(anyhow::anyhow!("relay down")));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ── FakePasswordEncoder ──────────────────────────────────────────────────────

/// Reversible stand-in so tests do not pay for argon2.
pub struct FakePasswordEncoder;

impl PasswordEncoder for FakePasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, AuthServiceError> {
        Ok(format!("encoded:{raw}"))
    }

    fn matches(&self, raw: &str, encoded: &str) -> Result<bool, AuthServiceError> {
        Ok(encoded == format!("encoded:{raw}"))
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub const TEST_PASSWORD: &str = "password123";

pub const ACTIVATION_URL: &str = "http://localhost:4200/activate-account";

/// 32 bytes, so HS256.
pub const TEST_SECRET: &str = "Ym9va25ldC1pbnRlZ3JhdGlvbi10ZXN0LXNlY3JldCE=";

pub fn user_role() -> Role {
    Role {
        id: 1,
        name: DEFAULT_ROLE.to_owned(),
    }
}

pub fn test_user() -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        firstname: "Ada".to_owned(),
        lastname: "Lovelace".to_owned(),
        email: "ada@books.example".to_owned(),
        password: format!("encoded:{TEST_PASSWORD}"),
        account_locked: false,
        enabled: true,
        roles: vec![user_role()],
        created_at: now,
        updated_at: now,
    }
}

pub fn test_jwt() -> JwtService {
    JwtService::from_base64_secret(TEST_SECRET, Duration::from_secs(3600)).unwrap()
}

pub fn issuer(
    tokens: MockActivationTokenRepo,
    mailer: RecordingMailer,
) -> ActivationIssuer<MockActivationTokenRepo, RecordingMailer> {
    ActivationIssuer {
        tokens,
        mailer,
        activation_url: ACTIVATION_URL.to_owned(),
    }
}
