//! End-to-end lifecycle through the public API, backed by the in-memory store

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use sg_core::services::token::TokenServiceConfig;
use sg_core::{
    CredentialHasher, DomainError, EmailService, InMemoryUserRepository, MemoryStore,
    RevocationStore, SessionConfig, SessionService, TokenError,
};

struct EchoHasher;

#[async_trait]
impl CredentialHasher for EchoHasher {
    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(password.chars().rev().collect())
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(password.chars().rev().collect::<String>() == hash)
    }
}

struct NullMailer;

#[async_trait]
impl EmailService for NullMailer {
    async fn send_email(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), DomainError> {
        Ok(())
    }
}

fn service(store: MemoryStore, access_ttl: i64) -> SessionService {
    let config = SessionConfig {
        token: TokenServiceConfig {
            jwt_secret: "lifecycle-secret".to_string(),
            access_token_ttl: access_ttl,
            refresh_token_ttl: 86400,
            password_reset_ttl: 3600,
            email_verification_ttl: 86400,
        },
        ..SessionConfig::default()
    };

    SessionService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(EchoHasher),
        Arc::new(NullMailer),
        Arc::new(store),
        config,
    )
}

fn expect_token_error(result: Result<impl std::fmt::Debug, DomainError>, expected: TokenError) {
    match result {
        Err(DomainError::Token(err)) => assert_eq!(err, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

#[tokio::test]
async fn alice_registers_validates_and_logs_out() {
    let sessions = service(MemoryStore::new(), 3600);

    let issued = sessions
        .register("alice", "alice@example.com", "correct-horse", "127.0.0.1")
        .await
        .expect("registration succeeds");

    let claims = sessions.validate(&issued.access_token).await.unwrap();
    assert_eq!(claims.email(), Some("alice@example.com"));

    sessions.logout(&issued.access_token, None).await.unwrap();
    expect_token_error(sessions.validate(&issued.access_token).await, TokenError::Revoked);
}

#[tokio::test]
async fn refresh_rotation_chain() {
    let sessions = service(MemoryStore::new(), 3600);
    let t1 = sessions
        .register("alice", "alice@example.com", "correct-horse", "127.0.0.1")
        .await
        .unwrap();

    let t2 = sessions.refresh(&t1.refresh_token, "127.0.0.1").await.unwrap();
    let t3 = sessions.refresh(&t2.refresh_token, "127.0.0.1").await.unwrap();

    expect_token_error(sessions.refresh(&t1.refresh_token, "127.0.0.1").await, TokenError::Revoked);
    expect_token_error(sessions.refresh(&t2.refresh_token, "127.0.0.1").await, TokenError::Revoked);
    assert!(sessions.validate(&t3.access_token).await.is_ok());

    // Access tokens from earlier rotations stay valid until they expire or are logged out.
    assert!(sessions.validate(&t1.access_token).await.is_ok());
}

#[tokio::test]
async fn revocation_entry_does_not_outlive_the_token() {
    let store = MemoryStore::new();
    let sessions = service(store.clone(), 1);

    let issued = sessions
        .register("bob", "bob@example.com", "builder-bob", "127.0.0.1")
        .await
        .unwrap();
    sessions.logout(&issued.access_token, None).await.unwrap();

    let key = RevocationStore::key_for(&issued.access_token);
    assert!(sg_core::KeyValueStore::exists(&store, &key).await.unwrap());

    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert!(!sg_core::KeyValueStore::exists(&store, &key).await.unwrap());
    expect_token_error(sessions.validate(&issued.access_token).await, TokenError::Expired);
}
