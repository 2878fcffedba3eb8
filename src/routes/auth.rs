// ABOUTME: Registration, login and token-verification route handlers
// ABOUTME: Validates credentials with bcrypt and issues JWT session tokens

use super::{authenticate, ServerResources};
use crate::auth::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User, UserSummary};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create the auth router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/register", post(Self::handle_register))
            .route("/login", post(Self::handle_login))
            .route("/verify", get(Self::handle_verify))
            .with_state(resources)
    }

    /// Handle user registration
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        if request.name.trim().len() < 2 {
            return Err(AppError::invalid_input(
                "Name must be at least 2 characters",
            ));
        }
        if !request.email.contains('@') {
            return Err(AppError::invalid_input("Valid email is required"));
        }
        if request.password.len() < 6 {
            return Err(AppError::invalid_input(
                "Password must be at least 6 characters",
            ));
        }

        if resources
            .database
            .get_user_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::already_exists(
                "User already exists with this email",
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(
            request.name.trim().to_owned(),
            request.email.clone(),
            password_hash,
        );
        resources.database.create_user(&user).await?;

        let token = resources.auth.generate_token(&user)?;
        info!(user.id = %user.id, "user registered");

        let response = AuthResponse {
            message: "User registered successfully".into(),
            token,
            user: UserSummary::from(&user),
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let user = resources
            .database
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid credentials"))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::auth_invalid("Invalid credentials"));
        }

        let token = resources.auth.generate_token(&user)?;
        info!(user.id = %user.id, "user logged in");

        let response = AuthResponse {
            message: "Login successful".into(),
            token,
            user: UserSummary::from(&user),
        };
        Ok(Json(response).into_response())
    }

    /// Handle token verification
    async fn handle_verify(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        Ok(Json(json!({ "user": UserSummary::from(&user) })).into_response())
    }
}
