//! Transform endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::metrics::OutputMetrics;
use crate::server::AppState;
use crate::transform::CustomerInput;

/// Query for the customer endpoint; falls back to the configured template
#[derive(Debug, Deserialize)]
pub struct CustomerTransformParams {
    pub template: Option<String>,
}

/// Query for the raw endpoint; the template is required
#[derive(Debug, Deserialize)]
pub struct RawTransformParams {
    pub template: String,
}

/// POST /api/transform/customer - Render a customer record
#[tracing::instrument(
    name = "http.transform_customer",
    skip_all,
    fields(customer_id = ?input.customer_id)
)]
pub async fn transform_customer(
    State(state): State<AppState>,
    Query(params): Query<CustomerTransformParams>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Map<String, Value>>> {
    let template = params
        .template
        .unwrap_or_else(|| state.settings.templates.customer.clone());

    tracing::info!(template = %template, "Received transformation request for customer");

    let service = state.transform.clone();
    let rendered = run_blocking(move || service.transform(&input, &template)).await??;

    Ok(Json(parse_output(&rendered)?))
}

/// POST /api/transform/raw - Render an arbitrary JSON document
#[tracing::instrument(
    name = "http.transform_raw",
    skip_all,
    fields(template = %params.template)
)]
pub async fn transform_raw(
    State(state): State<AppState>,
    Query(params): Query<RawTransformParams>,
    body: String,
) -> Result<Json<Map<String, Value>>> {
    tracing::info!("Received raw JSON transformation request");

    let service = state.transform.clone();
    let rendered = run_blocking(move || service.transform_raw(&body, &params.template)).await??;

    Ok(Json(parse_output(&rendered)?))
}

/// Run file I/O and rendering off the async workers
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Transform task failed: {}", e)))
}

/// Re-parse rendered template text as a JSON object
fn parse_output(rendered: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(rendered).map_err(|e| {
        OutputMetrics::record_invalid_json();
        AppError::InvalidOutput(e)
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => {
            OutputMetrics::record_invalid_json();
            Err(AppError::OutputNotObject(json_kind(&other)))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
