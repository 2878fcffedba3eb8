// ABOUTME: Dashboard route handlers for the landing page panels
// ABOUTME: Serves overview, recent-activity and quick-stats aggregation

use super::{authenticate, ServerResources};
use crate::errors::AppError;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Dashboard routes
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create the dashboard router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/overview", get(Self::handle_overview))
            .route("/recent-activity", get(Self::handle_recent_activity))
            .route("/quick-stats", get(Self::handle_quick_stats))
            .with_state(resources)
    }

    /// Headline figures plus today's plan
    async fn handle_overview(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let overview = resources.database.dashboard_overview(user.id).await?;
        Ok(Json(overview).into_response())
    }

    /// Latest workout logs and meals
    async fn handle_recent_activity(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let activity = resources.database.recent_activity(user.id).await?;
        Ok(Json(activity).into_response())
    }

    /// Compact statistics panel
    async fn handle_quick_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let stats = resources.database.quick_stats(user.id).await?;
        Ok(Json(stats).into_response())
    }
}
