use booknet_auth::domain::types::DEFAULT_ROLE;
use booknet_auth::error::AuthServiceError;
use booknet_auth::usecase::registration::{RegisterInput, RegisterUseCase};

use crate::helpers::{
    FakePasswordEncoder, MockActivationTokenRepo, MockRoleRepo, MockUserRepo, RecordingMailer,
    issuer, test_user,
};

type Register = RegisterUseCase<
    MockUserRepo,
    MockRoleRepo,
    FakePasswordEncoder,
    MockActivationTokenRepo,
    RecordingMailer,
>;

fn usecase(users: MockUserRepo, roles: MockRoleRepo, mailer: RecordingMailer) -> Register {
    let tokens = MockActivationTokenRepo::new(vec![], users.handle());
    RegisterUseCase {
        users,
        roles,
        passwords: FakePasswordEncoder,
        issuer: issuer(tokens, mailer),
        require_activation: false,
    }
}

fn input() -> RegisterInput {
    RegisterInput {
        firstname: " Grace ".to_owned(),
        lastname: "Hopper".to_owned(),
        email: "grace@books.example".to_owned(),
        password: "compilers!".to_owned(),
    }
}

#[tokio::test]
async fn should_register_user_and_mail_activation_code() {
    let users = MockUserRepo::empty();
    let users_handle = users.handle();
    let mailer = RecordingMailer::new();
    let sent = mailer.handle();
    let uc = usecase(users, MockRoleRepo::seeded(), mailer);
    let tokens = uc.issuer.tokens.handle();

    let user = uc.execute(input()).await.unwrap();

    assert_eq!(user.firstname, "Grace");
    assert_eq!(user.password, "encoded:compilers!");
    assert!(!user.account_locked);
    assert!(user.enabled, "enabled by default");
    assert_eq!(user.roles.len(), 1);
    assert_eq!(user.roles[0].name, DEFAULT_ROLE);
    assert_eq!(users_handle.lock().unwrap().len(), 1);

    let tokens = tokens.lock().unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].user_id, user.id);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "grace@books.example");
    assert_eq!(sent[0].username, "Grace Hopper");
    assert_eq!(sent[0].activation_code, tokens[0].code);
}

#[tokio::test]
async fn should_create_disabled_user_when_activation_required() {
    let mut uc = usecase(
        MockUserRepo::empty(),
        MockRoleRepo::seeded(),
        RecordingMailer::new(),
    );
    uc.require_activation = true;

    let user = uc.execute(input()).await.unwrap();

    assert!(!user.enabled);
}

#[tokio::test]
async fn should_fail_when_default_role_missing() {
    let uc = usecase(
        MockUserRepo::empty(),
        MockRoleRepo::empty(),
        RecordingMailer::new(),
    );

    let result = uc.execute(input()).await;

    assert!(
        matches!(result, Err(AuthServiceError::RoleNotFound)),
        "expected RoleNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let existing = test_user();
    let mailer = RecordingMailer::new();
    let sent = mailer.handle();
    let uc = usecase(
        MockUserRepo::new(vec![existing.clone()]),
        MockRoleRepo::seeded(),
        mailer,
    );

    let result = uc
        .execute(RegisterInput {
            email: existing.email,
            ..input()
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::UserAlreadyExists)),
        "expected UserAlreadyExists, got {result:?}"
    );
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_report_all_violations() {
    let users = MockUserRepo::empty();
    let users_handle = users.handle();
    let uc = usecase(users, MockRoleRepo::seeded(), RecordingMailer::new());

    let result = uc
        .execute(RegisterInput {
            firstname: String::new(),
            lastname: String::new(),
            email: "not-an-email".to_owned(),
            password: "short".to_owned(),
        })
        .await;

    match result {
        Err(AuthServiceError::Validation(msg)) => {
            assert!(msg.contains("firstname is mandatory"), "{msg}");
            assert!(msg.contains("lastname is mandatory"), "{msg}");
            assert!(msg.contains("email is not well formed"), "{msg}");
            assert!(msg.contains("8 characters"), "{msg}");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert!(users_handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_keep_user_when_mail_delivery_fails() {
    let users = MockUserRepo::empty();
    let users_handle = users.handle();
    let uc = usecase(users, MockRoleRepo::seeded(), RecordingMailer::failing());

    let result = uc.execute(input()).await;

    assert!(
        matches!(result, Err(AuthServiceError::Delivery(_))),
        "expected Delivery, got {result:?}"
    );
    assert_eq!(users_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_store_trimmed_email() {
    let users = MockUserRepo::empty();
    let users_handle = users.handle();
    let uc = usecase(users, MockRoleRepo::seeded(), RecordingMailer::new());

    let user = uc
        .execute(RegisterInput {
            email: "  grace@books.example ".to_owned(),
            ..input()
        })
        .await
        .unwrap();

    assert_eq!(user.email, "grace@books.example");
    assert_eq!(users_handle.lock().unwrap()[0].email, "grace@books.example");
}
