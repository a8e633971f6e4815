use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::health::health;
use super::metrics::prometheus_metrics;
use super::transform::{transform_customer, transform_raw};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Transform endpoints
        .nest(
            "/api/transform",
            Router::new()
                .route("/customer", post(transform_customer))
                .route("/raw", post(transform_raw)),
        )
}
