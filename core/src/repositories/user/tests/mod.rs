//! Unit tests for the in-memory user repository

use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::user::{InMemoryUserRepository, UserRepository};

#[tokio::test]
async fn test_create_and_find() {
    let repo = InMemoryUserRepository::new();
    let user = User::new("alice", "alice@example.com", "hash".to_string());

    let created = repo.create(user.clone()).await.unwrap();
    assert_eq!(created.id, user.id);

    let by_id = repo.find_by_id(user.id).await.unwrap();
    assert_eq!(by_id.map(|u| u.email), Some("alice@example.com".to_string()));

    let by_email = repo.find_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));
}

#[tokio::test]
async fn test_missing_user_is_none() {
    let repo = InMemoryUserRepository::new();
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let repo = InMemoryUserRepository::new();
    repo.create(User::new("alice", "alice@example.com", "h1".to_string()))
        .await
        .unwrap();

    let result = repo
        .create(User::new("alice2", "ALICE@example.com", "h2".to_string()))
        .await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_update_unknown_user() {
    let repo = InMemoryUserRepository::new();
    let result = repo
        .update(User::new("ghost", "ghost@example.com", "h".to_string()))
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_update_persists_changes() {
    let repo = InMemoryUserRepository::new();
    let mut user = repo
        .create(User::new("bob", "bob@example.com", "h".to_string()))
        .await
        .unwrap();

    user.verify_email();
    repo.update(user.clone()).await.unwrap();

    let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert!(stored.email_verified);
}
