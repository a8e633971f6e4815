// Infrastructure layer (shared components)
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain layer (business logic)
pub mod template;
pub mod transform;

// Application layer
pub mod api;
pub mod server;
