//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub templates: TemplatesHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct TemplatesHealthResponse {
    pub path: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// GET /health - Service and template directory status
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.transform.engine().store();

    // The directory can disappear after startup; report it instead of failing
    let count = match store.list() {
        Ok(names) => Some(names.len()),
        Err(e) => {
            tracing::warn!(error = %e, "Template directory unavailable");
            None
        }
    };
    let available = count.is_some();

    let status = if available { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        templates: TemplatesHealthResponse {
            path: store.root().display().to_string(),
            available,
            count,
        },
    })
}
