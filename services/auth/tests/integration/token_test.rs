use std::time::Duration;

use chrono::Utc;

use booknet_auth::error::AuthServiceError;
use booknet_auth::usecase::token::CheckTokenUseCase;
use booknet_auth_types::token::{ClaimValue, ExtraClaims, FULL_NAME_CLAIM, JwtService};

use crate::helpers::{MockUserRepo, test_jwt, test_user};

fn full_name_claim() -> ExtraClaims {
    ExtraClaims::from([(FULL_NAME_CLAIM.to_owned(), ClaimValue::from("Ada Lovelace"))])
}

#[tokio::test]
async fn should_return_identity_for_valid_token() {
    let user = test_user();
    let jwt = test_jwt();
    let token = jwt.issue_token(&user, full_name_claim()).unwrap();
    let uc = CheckTokenUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        jwt,
    };

    let out = uc.execute(&token).await.unwrap();

    assert_eq!(out.username, user.email);
    assert_eq!(out.authorities, vec!["USER".to_owned()]);
    assert_eq!(out.full_name.as_deref(), Some("Ada Lovelace"));
    assert!(out.expires_at > Utc::now());
}

#[tokio::test]
async fn should_reject_token_of_deleted_user() {
    let user = test_user();
    let jwt = test_jwt();
    let token = jwt.issue_token(&user, ExtraClaims::new()).unwrap();
    let uc = CheckTokenUseCase {
        users: MockUserRepo::empty(),
        jwt,
    };

    let result = uc.execute(&token).await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_token() {
    let user = test_user();
    let jwt = test_jwt();
    let issued = Utc::now() - chrono::Duration::hours(2);
    let token = jwt.issue_token_at(&user, ExtraClaims::new(), issued).unwrap();
    let uc = CheckTokenUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt,
    };

    let result = uc.execute(&token).await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_foreign_signature() {
    let user = test_user();
    let other = JwtService::from_base64_secret(
        "YW5vdGhlci1ib29rbmV0LXRlc3Qtc2VjcmV0LWtleSE=",
        Duration::from_secs(3600),
    )
    .unwrap();
    let token = other.issue_token(&user, ExtraClaims::new()).unwrap();
    let uc = CheckTokenUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt: test_jwt(),
    };

    let result = uc.execute(&token).await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidSignature)),
        "expected InvalidSignature, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_tampered_signature() {
    let user = test_user();
    let jwt = test_jwt();
    let token = jwt.issue_token(&user, ExtraClaims::new()).unwrap();
    let (unsigned, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{unsigned}.{flipped}{}", &signature[1..]);
    let uc = CheckTokenUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt,
    };

    let result = uc.execute(&tampered).await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidSignature)),
        "expected InvalidSignature, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_garbage_token() {
    let uc = CheckTokenUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        jwt: test_jwt(),
    };

    let result = uc.execute("not.a.jwt").await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}
