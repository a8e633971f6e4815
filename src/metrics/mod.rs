//! Prometheus metrics for the transform service.
//!
//! This module provides metrics for monitoring template transformations:
//! - Transform metrics (rendered, failed by reason, render latency)
//! - Output metrics (rendered text that is not valid JSON)

mod helpers;

pub use helpers::{encode_metrics, OutputMetrics, TransformMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "transform";

lazy_static! {
    // ============================================================================
    // Transform Metrics
    // ============================================================================

    /// Successful renders by input source (customer, raw, value)
    pub static ref TRANSFORMS_RENDERED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_rendered_total", METRIC_PREFIX),
        "Total templates rendered successfully",
        &["source"]
    ).unwrap();

    /// Failed transforms by input source and failure reason
    pub static ref TRANSFORMS_FAILED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_failed_total", METRIC_PREFIX),
        "Total transformations that failed",
        &["source", "reason"]
    ).unwrap();

    /// Time spent resolving and rendering a template
    pub static ref RENDER_LATENCY: HistogramVec = register_histogram_vec!(
        format!("{}_render_latency_seconds", METRIC_PREFIX),
        "Template resolve and render latency in seconds",
        &["source"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    ).unwrap();

    // ============================================================================
    // Output Metrics
    // ============================================================================

    /// Rendered output that failed to parse as JSON
    pub static ref OUTPUT_INVALID_TOTAL: IntCounter = register_int_counter!(
        format!("{}_output_invalid_json_total", METRIC_PREFIX),
        "Total rendered outputs that were not valid JSON"
    ).unwrap();
}
