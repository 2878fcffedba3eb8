// ABOUTME: Meal and calorie-tracking route handlers
// ABOUTME: Meal CRUD plus weekly/monthly calorie aggregation endpoints

use super::{authenticate, ServerResources};
use crate::errors::AppError;
use crate::models::NewMealRequest;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Meal and calorie routes
pub struct CalorieRoutes;

impl CalorieRoutes {
    /// Create the calories router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", post(Self::handle_add_meal))
            .route("/today", get(Self::handle_today))
            .route("/weekly", get(Self::handle_weekly))
            .route("/monthly", get(Self::handle_monthly))
            .route("/summary", get(Self::handle_summary))
            .route("/:meal_id", delete(Self::handle_delete_meal))
            .with_state(resources)
    }

    /// Fetch today's meals plus the calorie total
    async fn handle_today(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let meals = resources
            .database
            .meals_for_date(user.id, Utc::now().date_naive())
            .await?;
        Ok(Json(meals).into_response())
    }

    /// Record a meal
    async fn handle_add_meal(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<NewMealRequest>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;

        if request.food_name.trim().is_empty() {
            return Err(AppError::invalid_input("Food name is required"));
        }
        if request.calories < 0 {
            return Err(AppError::invalid_input(
                "Calories must be a positive number",
            ));
        }
        for (label, value) in [
            ("Protein", request.protein),
            ("Carbs", request.carbs),
            ("Fat", request.fat),
        ] {
            if value.is_some_and(|v| v < 0.0) {
                return Err(AppError::invalid_input(format!(
                    "{label} must be a positive number"
                )));
            }
        }

        let meal_id = resources.database.add_meal(user.id, &request).await?;

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "message": "Meal added successfully",
                "mealId": meal_id,
            })),
        )
            .into_response())
    }

    /// Delete a meal
    async fn handle_delete_meal(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(meal_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;

        if resources.database.delete_meal(user.id, meal_id).await? {
            Ok(Json(json!({ "message": "Meal deleted successfully" })).into_response())
        } else {
            Err(AppError::not_found("Meal"))
        }
    }

    /// Per-day calorie totals for the trailing week
    async fn handle_weekly(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let data = resources.database.daily_calories(user.id, "-7 days").await?;
        Ok(Json(data).into_response())
    }

    /// Per-day calorie totals for the trailing 30 days
    async fn handle_monthly(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let data = resources
            .database
            .daily_calories(user.id, "-30 days")
            .await?;
        Ok(Json(data).into_response())
    }

    /// Headline calorie figures
    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let summary = resources.database.calorie_summary(user.id).await?;
        Ok(Json(summary).into_response())
    }
}
