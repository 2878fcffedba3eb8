// ABOUTME: Workout plan and workout log route handlers
// ABOUTME: Hosts the plan upload endpoint that feeds the ingestion pipeline

use super::{authenticate, ServerResources};
use crate::errors::AppError;
use crate::ingest;
use crate::models::LogWorkoutRequest;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Declared content types accepted for plan uploads, matching the frontend's
/// file picker. Anything else is rejected before the pipeline is invoked.
const ALLOWED_UPLOAD_TYPES: [&str; 4] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "text/csv",
    "application/csv",
];

/// Multipart field name carrying the uploaded plan
const UPLOAD_FIELD: &str = "workoutFile";

/// Workout plan and log routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create the workouts router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_list_plan))
            .route("/today", get(Self::handle_today_plan))
            .route("/upload", post(Self::handle_upload))
            .route("/log", post(Self::handle_log_workout))
            .route(
                "/logs",
                get(Self::handle_logs_in_range),
            )
            .route(
                "/logs/:selector",
                get(Self::handle_logs_for_date).delete(Self::handle_delete_log),
            )
            .with_state(resources)
    }

    /// Upload a new workout plan, replacing the stored one
    async fn handle_upload(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;

        let mut upload: Option<(String, Vec<u8>)> = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::invalid_input(format!("Malformed upload: {e}")))?
        {
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }
            let content_type = field.content_type().unwrap_or_default().to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::invalid_input(format!("Error reading uploaded file: {e}")))?;
            upload = Some((content_type, bytes.to_vec()));
            break;
        }

        let Some((content_type, bytes)) = upload else {
            return Err(AppError::invalid_input("No file uploaded"));
        };

        if !is_allowed_upload_type(&content_type) {
            return Err(AppError::invalid_input(
                "Invalid file type. Only Excel and CSV files are allowed.",
            ));
        }

        let result = ingest::ingest_plan(&resources.database, user.id, &bytes, &content_type)
            .await
            .map_err(|e| {
                warn!(user.id = %user.id, error = %e, "plan upload failed");
                AppError::from(e)
            })?;

        Ok(Json(json!({
            "message": "Workout plan uploaded successfully",
            "exercises": result.records,
            "totalExercises": result.total,
        }))
        .into_response())
    }

    /// Fetch the full workout plan
    async fn handle_list_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let workouts = resources.database.get_workout_plan(user.id).await?;
        Ok(Json(workouts).into_response())
    }

    /// Fetch today's plan rows
    async fn handle_today_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let weekday = Utc::now().format("%A").to_string();
        let workouts = resources
            .database
            .get_workouts_for_day(user.id, &weekday)
            .await?;
        Ok(Json(workouts).into_response())
    }

    /// Record a completed workout
    async fn handle_log_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<LogWorkoutRequest>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let log_id = resources
            .database
            .log_workout(user.id, &request, Utc::now().date_naive())
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "message": "Workout logged successfully",
                "logId": log_id,
            })),
        )
            .into_response())
    }

    /// Fetch logs over an optional date range
    async fn handle_logs_in_range(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(filter): Query<crate::database::LogRangeFilter>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let logs = resources.database.logs_in_range(user.id, filter).await?;
        Ok(Json(logs).into_response())
    }

    /// Fetch one day's logs
    async fn handle_logs_for_date(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(selector): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let date: NaiveDate = selector
            .parse()
            .map_err(|_| AppError::invalid_input("Date must be YYYY-MM-DD"))?;
        let logs = resources.database.logs_for_date(user.id, date).await?;
        Ok(Json(logs).into_response())
    }

    /// Delete a log entry
    async fn handle_delete_log(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(selector): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let log_id: i64 = selector
            .parse()
            .map_err(|_| AppError::invalid_input("Log id must be an integer"))?;

        if resources.database.delete_log(user.id, log_id).await? {
            Ok(Json(json!({ "message": "Log deleted successfully" })).into_response())
        } else {
            Err(AppError::not_found("Log"))
        }
    }
}

fn is_allowed_upload_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ALLOWED_UPLOAD_TYPES.contains(&mime.as_str())
}
