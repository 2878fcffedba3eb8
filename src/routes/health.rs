// ABOUTME: Health check route
// ABOUTME: Unauthenticated liveness endpoint for deploy probes

use axum::response::Json;
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health router
    #[must_use]
    pub fn routes() -> Router {
        Router::new().route("/api/health", get(Self::handle_health))
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "status": "OK",
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }
}
