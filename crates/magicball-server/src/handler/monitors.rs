//! Liveness probe.

use axum::Router;
use axum::routing::get;

use crate::extract::Json;
use crate::handler::response::HealthResponse;
use crate::service::ServiceState;

/// Reports that the process is up and serving requests.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
    })
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health))
}
