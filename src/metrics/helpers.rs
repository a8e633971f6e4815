//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{OUTPUT_INVALID_TOTAL, RENDER_LATENCY, TRANSFORMS_FAILED_TOTAL, TRANSFORMS_RENDERED_TOTAL};
use crate::template::TemplateError;

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording transform metrics
pub struct TransformMetrics;

impl TransformMetrics {
    /// Record a successful render and its latency
    pub fn record_rendered(source: &str, elapsed: Duration) {
        TRANSFORMS_RENDERED_TOTAL.with_label_values(&[source]).inc();
        RENDER_LATENCY
            .with_label_values(&[source])
            .observe(elapsed.as_secs_f64());
    }

    /// Record a failed transform
    pub fn record_failed(source: &str, reason: &str) {
        TRANSFORMS_FAILED_TOTAL
            .with_label_values(&[source, reason])
            .inc();
    }

    /// Metric label for a template failure
    pub fn template_reason(err: &TemplateError) -> &'static str {
        match err {
            TemplateError::NotFound(_) => "template_not_found",
            TemplateError::Syntax { .. } => "template_syntax",
            TemplateError::Render { .. } => "render",
            TemplateError::Io { .. } | TemplateError::Directory { .. } => "io",
        }
    }
}

/// Helper struct for recording output metrics
pub struct OutputMetrics;

impl OutputMetrics {
    /// Record rendered text that could not be parsed back into JSON
    pub fn record_invalid_json() {
        OUTPUT_INVALID_TOTAL.inc();
    }
}
