// ABOUTME: Database management for the Chart2Fit fitness tracker
// ABOUTME: Owns the sqlx pool, schema bootstrap and the per-user plan-replacement locks
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Database Management
//!
//! Storage for users, workout plans, workout logs and meals. The `Database`
//! handle owns a sqlx connection pool and is injected into the route layer
//! and the ingestion pipeline; its lifecycle belongs to the binary, not to
//! any component that uses it.

mod dashboard;
mod logs;
mod meals;
mod users;
mod workouts;

pub use dashboard::{DashboardOverview, QuickStats, RecentActivity, RecentWorkout};
pub use logs::LogRangeFilter;
pub use meals::{CalorieSummary, DailyCalories, TodayMeals};
pub use workouts::{CompletionPoint, ProgressPeriod, ProgressSummary, StrengthPoint, TopExercise};

use anyhow::Result;
use dashmap::DashMap;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Database manager for fitness tracker storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
    // One async mutex per user; serializes plan replacement so concurrent
    // uploads for the same user cannot interleave delete/insert.
    plan_locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl Database {
    /// Create a new database connection and bootstrap the schema
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or the
    /// schema bootstrap fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = if database_url.contains(":memory:") {
            // In-memory databases exist per connection; a single permanent
            // connection keeps every query on the same instance.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await?
        } else {
            // Ensure SQLite creates the database file if it doesn't exist
            let connection_options = if database_url.starts_with("sqlite:") {
                format!("{database_url}?mode=rwc")
            } else {
                database_url.to_owned()
            };
            SqlitePool::connect(&connection_options).await?
        };

        let db = Self {
            pool,
            plan_locks: Arc::new(DashMap::new()),
        };

        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run the idempotent schema bootstrap
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_workouts().await?;
        self.migrate_logs().await?;
        self.migrate_meals().await?;
        Ok(())
    }

    /// Exclusive per-user scope for plan replacement
    pub(crate) fn plan_lock(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        self.plan_locks.entry(user_id).or_default().clone()
    }
}
