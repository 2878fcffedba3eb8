// ABOUTME: REST route assembly for the Chart2Fit server
// ABOUTME: Builds the axum router and hosts the shared bearer-token authentication helper
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # REST API routes
//!
//! Route handlers are grouped per area and assembled into one router here.
//! Every non-auth route authenticates the bearer token per handler via
//! [`authenticate`]; there is no extractor-based auth middleware.

pub mod auth;
pub mod calories;
pub mod dashboard;
pub mod health;
pub mod progress;
pub mod workouts;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::AppError;
use crate::models::User;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderMap;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Shared state injected into every route handler
pub struct ServerResources {
    /// Storage handle
    pub database: Database,
    /// Token and password authority
    pub auth: AuthManager,
    /// Server configuration
    pub config: ServerConfig,
}

/// Build the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    let max_body = resources.config.max_upload_bytes;

    Router::new()
        .nest("/api/auth", auth::AuthRoutes::routes(resources.clone()))
        .nest(
            "/api/workouts",
            workouts::WorkoutRoutes::routes(resources.clone()),
        )
        .nest(
            "/api/calories",
            calories::CalorieRoutes::routes(resources.clone()),
        )
        .nest(
            "/api/progress",
            progress::ProgressRoutes::routes(resources.clone()),
        )
        .nest(
            "/api/dashboard",
            dashboard::DashboardRoutes::routes(resources),
        )
        .merge(health::HealthRoutes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // The upload size ceiling doubles as the global body limit.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body))
}

/// Extract and authenticate the user from the authorization header
///
/// # Errors
///
/// Returns an [`AppError`] when the header is missing or malformed, the
/// token does not validate, or the user no longer exists.
pub(crate) async fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> Result<User, AppError> {
    let header = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(AppError::auth_required)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::auth_invalid("Malformed authorization header"))?;

    let claims = resources
        .auth
        .validate_token(token)
        .map_err(|e| AppError::auth_invalid(e.to_string()))?;
    let user_id = claims
        .user_id()
        .map_err(|e| AppError::auth_invalid(e.to_string()))?;

    resources
        .database
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::auth_invalid("User not found"))
}
