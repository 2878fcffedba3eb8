// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and user creation helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    missing_docs,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! Shared test utilities for `chart2fit`

use anyhow::Result;
use chart2fit::auth::{generate_jwt_secret, AuthManager};
use chart2fit::database::Database;
use chart2fit::models::{NewWorkout, User};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Database::new("sqlite::memory:").await
}

/// Create test authentication manager
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(generate_jwt_secret().to_vec(), 24)
}

/// Create a standard test user
pub async fn create_test_user(database: &Database) -> Result<User> {
    create_test_user_with_email(database, "test@example.com").await
}

/// Create a test user with custom email
pub async fn create_test_user_with_email(database: &Database, email: &str) -> Result<User> {
    let user = User::new("Test User".into(), email.into(), "test_hash".into());
    database.create_user(&user).await?;
    Ok(user)
}

/// A small plan used by replacement and logging tests
pub fn sample_plan() -> Vec<NewWorkout> {
    vec![
        NewWorkout {
            day: "Monday".into(),
            exercise: "Squat".into(),
            sets: 3,
            reps: 5,
            start_weight: Some(60.0),
            progression_rule: Some("+2.5kg/week".into()),
        },
        NewWorkout {
            day: "Tuesday".into(),
            exercise: "Bench Press".into(),
            sets: 4,
            reps: 8,
            start_weight: Some(40.0),
            progression_rule: None,
        },
    ]
}
