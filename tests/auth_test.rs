// ABOUTME: Integration tests for authentication and user storage
// ABOUTME: Validates password hashing, token round trips and duplicate registration
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chart2fit::auth::{hash_password, verify_password};
use chart2fit::models::User;

#[tokio::test]
async fn test_create_and_fetch_user() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    let by_email = database
        .get_user_by_email("test@example.com")
        .await
        .unwrap()
        .expect("user by email");
    assert_eq!(by_email.id, user.id);
    assert_eq!(by_email.name, "Test User");

    let by_id = database
        .get_user_by_id(user.id)
        .await
        .unwrap()
        .expect("user by id");
    assert_eq!(by_id.email, "test@example.com");
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let database = common::create_test_database().await.unwrap();
    common::create_test_user(&database).await.unwrap();

    let duplicate = User::new(
        "Other".into(),
        "test@example.com".into(),
        "other_hash".into(),
    );
    assert!(database.create_user(&duplicate).await.is_err());
}

#[tokio::test]
async fn test_unknown_user_lookups_return_none() {
    let database = common::create_test_database().await.unwrap();
    assert!(database
        .get_user_by_email("nobody@example.com")
        .await
        .unwrap()
        .is_none());
    assert!(database
        .get_user_by_id(uuid::Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_credential_round_trip_against_stored_hash() {
    let database = common::create_test_database().await.unwrap();

    let hash = hash_password("correct horse battery").unwrap();
    let user = User::new("Login User".into(), "login@example.com".into(), hash);
    database.create_user(&user).await.unwrap();

    let stored = database
        .get_user_by_email("login@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(verify_password("correct horse battery", &stored.password_hash).unwrap());
    assert!(!verify_password("incorrect", &stored.password_hash).unwrap());
}

#[test]
fn test_token_identifies_user() {
    let manager = common::create_test_auth_manager();
    let user = User::new("A".into(), "a@example.com".into(), "hash".into());

    let token = manager.generate_token(&user).unwrap();
    let claims = manager.validate_token(&token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.email, "a@example.com");
}
