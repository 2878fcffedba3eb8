// ABOUTME: Core data models for the Chart2Fit fitness tracker
// ABOUTME: Defines User, Workout, WorkoutLog, Meal and the API request/response types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Data Models
//!
//! Common data structures shared by the ingestion pipeline, the storage layer
//! and the REST API. One [`Workout`] row is one line item of a user's current
//! workout plan; the whole set is replaced atomically on every plan upload.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address (used for login, unique)
    pub email: String,
    /// Bcrypt password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a generated id
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Public view of a user, embedded in auth responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// User identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// One persisted line item of a user's workout plan
///
/// Produced by the ingestion pipeline and replaced wholesale on the next
/// plan upload for the same user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Generated row identifier
    pub id: i64,
    /// Owning user
    pub user_id: Uuid,
    /// Day label from the uploaded plan (free text, e.g. "Monday")
    pub day: String,
    /// Exercise name (free text)
    pub exercise: String,
    /// Planned set count (0 when the source cell was absent or unparsable)
    pub sets: i64,
    /// Planned rep count (0 when the source cell was absent or unparsable)
    pub reps: i64,
    /// Starting weight, if the plan declared one
    pub start_weight: Option<f64>,
    /// Progression rule, if the plan declared one (free text)
    pub progression_rule: Option<String>,
    /// When the row was inserted
    pub created_at: DateTime<Utc>,
}

/// A normalized workout-plan row that has not been persisted yet
///
/// This is what the row extractor emits for each surviving source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkout {
    /// Day label, trimmed, case preserved
    pub day: String,
    /// Exercise name, trimmed, case preserved
    pub exercise: String,
    /// Set count, defaulted to 0 on parse failure
    pub sets: i64,
    /// Rep count, defaulted to 0 on parse failure
    pub reps: i64,
    /// Starting weight, `None` on parse failure or absent column
    pub start_weight: Option<f64>,
    /// Progression rule, `None` when blank or absent
    pub progression_rule: Option<String>,
}

/// Result of one plan ingestion: the persisted records plus a count
#[derive(Debug, Clone, Serialize)]
pub struct IngestionResult {
    /// Records stored for this upload, in source order
    pub records: Vec<Workout>,
    /// Number of records stored
    pub total: usize,
}

/// A completed-workout log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLog {
    /// Generated row identifier
    pub id: i64,
    /// Owning user
    pub user_id: Uuid,
    /// Plan row this log refers to
    pub workout_id: i64,
    /// Sets actually performed
    pub actual_sets: i64,
    /// Reps actually performed
    pub actual_reps: i64,
    /// Weight actually used
    pub actual_weight: Option<f64>,
    /// Day the workout was performed
    pub date: NaiveDate,
    /// When the log was recorded
    pub created_at: DateTime<Utc>,
}

/// A log entry joined with the planned values it was logged against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLogDetail {
    /// The log row
    #[serde(flatten)]
    pub log: WorkoutLog,
    /// Exercise name from the plan
    pub exercise: String,
    /// Planned set count
    pub planned_sets: i64,
    /// Planned rep count
    pub planned_reps: i64,
    /// Planned starting weight
    pub planned_weight: Option<f64>,
}

/// A tracked meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    /// Generated row identifier
    pub id: i64,
    /// Owning user
    pub user_id: Uuid,
    /// Food name
    pub food_name: String,
    /// Calories
    pub calories: i64,
    /// Protein in grams
    pub protein: Option<f64>,
    /// Carbohydrates in grams
    pub carbs: Option<f64>,
    /// Fat in grams
    pub fat: Option<f64>,
    /// Day the meal was eaten
    pub date: NaiveDate,
    /// When the meal was recorded
    pub created_at: DateTime<Utc>,
}

// ── API request/response types ──────────────────────────────────────────

/// Registration request body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Display name, at least 2 characters
    pub name: String,
    /// Email address
    pub email: String,
    /// Password, at least 6 characters
    pub password: String,
}

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// Successful authentication response
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Human-readable status message
    pub message: String,
    /// Signed JWT session token
    pub token: String,
    /// The authenticated user
    pub user: UserSummary,
}

/// Request body for logging a completed workout
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogWorkoutRequest {
    /// Plan row being logged
    pub workout_id: i64,
    /// Sets actually performed
    pub actual_sets: i64,
    /// Reps actually performed
    pub actual_reps: i64,
    /// Weight actually used
    #[serde(default)]
    pub actual_weight: Option<f64>,
}

/// Request body for adding a meal
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMealRequest {
    /// Food name, non-blank
    pub food_name: String,
    /// Calories, non-negative
    pub calories: i64,
    /// Protein in grams
    #[serde(default)]
    pub protein: Option<f64>,
    /// Carbohydrates in grams
    #[serde(default)]
    pub carbs: Option<f64>,
    /// Fat in grams
    #[serde(default)]
    pub fat: Option<f64>,
    /// Day the meal was eaten; defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new_generates_distinct_ids() {
        let a = User::new("A".into(), "a@example.com".into(), "hash".into());
        let b = User::new("B".into(), "b@example.com".into(), "hash".into());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_user_serialization_skips_password_hash() {
        let user = User::new("A".into(), "a@example.com".into(), "secret-hash".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("a@example.com"));
    }

    #[test]
    fn test_log_workout_request_accepts_camel_case() {
        let body = r#"{"workoutId": 3, "actualSets": 5, "actualReps": 5, "actualWeight": 62.5}"#;
        let request: LogWorkoutRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.workout_id, 3);
        assert_eq!(request.actual_weight, Some(62.5));
    }
}
