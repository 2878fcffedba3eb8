// ABOUTME: Main library entry point for the Chart2Fit fitness tracker backend
// ABOUTME: Exposes the workout-plan ingestion pipeline and the REST service around it
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![deny(unsafe_code)]

//! # Chart2Fit Server
//!
//! A personal fitness tracker backend. Users upload a spreadsheet or CSV
//! describing a multi-day workout program; the server locates the header row,
//! infers which column plays which role, normalizes the cell values and
//! atomically replaces the user's stored plan. Around that core sits a REST
//! API for workout logging, calorie tracking and dashboard aggregation.
//!
//! ## Architecture
//!
//! - **Ingest**: the spreadsheet/CSV → workout-plan pipeline
//! - **Database**: sqlx-backed storage for users, workouts, logs and meals
//! - **Auth**: bcrypt password hashing and JWT session tokens
//! - **Routes**: axum REST surface consumed by the web frontend
//!
//! ## Example
//!
//! ```rust,no_run
//! use chart2fit::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Chart2Fit configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Authentication and session token management
pub mod auth;

/// Configuration management
pub mod config;

/// Storage layer for users, workouts, logs and meals
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Workout-plan ingestion pipeline (decode → locate → resolve → extract → replace)
pub mod ingest;

/// Production logging and structured output
pub mod logging;

/// Common data models
pub mod models;

/// `HTTP` routes for the REST API
pub mod routes;
