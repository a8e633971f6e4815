//! API layer - HTTP endpoint handlers.

mod health;
mod metrics;
mod routes;
mod transform;

// Re-export all handlers for use in server/app.rs
pub use health::{health, HealthResponse, TemplatesHealthResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use transform::{
    transform_customer, transform_raw, CustomerTransformParams, RawTransformParams,
};
