//! Observability HTTP Routes
//!
//! Liveness and readiness probes. Readiness runs a row count against the
//! backing store, so it fails while the database is unreachable or the
//! table is missing.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use super::student_routes::StudentState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// `/health` and `/health/ready`
pub fn health_routes(state: Arc<StudentState>) -> Router {
    Router::new()
        .route("/health", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .with_state(state)
}

async fn liveness_handler() -> Json<HealthResponse> {
    Json(HealthResponse::new("ok"))
}

async fn readiness_handler(
    State(state): State<Arc<StudentState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = Arc::clone(state.repository.store());
    let probe = tokio::task::spawn_blocking(move || store.count(None)).await;

    match probe {
        Ok(Ok(_)) => (StatusCode::OK, Json(HealthResponse::new("ok"))),
        Ok(Err(err)) => {
            warn!(error = %err, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::new("unavailable")),
            )
        }
        Err(err) => {
            warn!(error = %err, "readiness probe panicked");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::new("unavailable")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let json = serde_json::to_value(HealthResponse::new("ok")).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
