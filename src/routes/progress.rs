// ABOUTME: Progress route handlers for completion and strength charts
// ABOUTME: Serves windowed aggregation over workout logs joined with the plan

use super::{authenticate, ServerResources};
use crate::database::ProgressPeriod;
use crate::errors::AppError;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for completion data (defaults to the trailing week)
#[derive(Debug, Deserialize)]
struct CompletionQuery {
    #[serde(default)]
    period: ProgressPeriod,
}

/// Query parameters for strength data (defaults to the trailing month)
#[derive(Debug, Deserialize)]
struct StrengthQuery {
    #[serde(default = "default_strength_period")]
    period: ProgressPeriod,
}

const fn default_strength_period() -> ProgressPeriod {
    ProgressPeriod::Month
}

/// Progress routes
pub struct ProgressRoutes;

impl ProgressRoutes {
    /// Create the progress router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/completion", get(Self::handle_completion))
            .route("/strength", get(Self::handle_strength))
            .route("/summary", get(Self::handle_summary))
            .with_state(resources)
    }

    /// Per-date workout completion data
    async fn handle_completion(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<CompletionQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let data = resources
            .database
            .completion_data(user.id, query.period)
            .await?;
        Ok(Json(data).into_response())
    }

    /// Per-exercise strength progression data
    async fn handle_strength(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<StrengthQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let data = resources
            .database
            .strength_data(user.id, query.period)
            .await?;
        Ok(Json(data).into_response())
    }

    /// Overall progress summary
    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let summary = resources.database.progress_summary(user.id).await?;
        Ok(Json(summary).into_response())
    }
}
