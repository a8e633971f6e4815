//! File-based template rendering.
//!
//! This module provides:
//! - `TemplateStore`: the on-disk directory templates are resolved from
//! - `TemplateEngine`: the narrow resolve/render seam the transform pipeline depends on
//! - `TeraEngine`: the Tera-backed engine configured from immutable `EngineOptions`
//!
//! # Example
//!
//! ```ignore
//! let engine = TeraEngine::new(EngineOptions::new("./templates"))?;
//!
//! let template = engine.resolve("customer-transform.ftl")?;
//!
//! let mut model = DataModel::new();
//! model.insert("customerId".to_string(), json!("C1"));
//!
//! let rendered = engine.render(&template, &model)?;
//! ```

mod engine;
mod store;

use std::path::PathBuf;

use thiserror::Error;

pub use engine::{EngineOptions, TemplateEngine, TeraEngine, TeraTemplate};
pub use store::TemplateStore;

/// Insertion-ordered mapping exposed to a template while rendering
pub type DataModel = serde_json::Map<String, serde_json::Value>;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template syntax error in '{name}': {message}")]
    Syntax { name: String, message: String },

    #[error("Rendering error in '{name}': {message}")]
    Render { name: String, message: String },

    #[error("Failed to read template '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to prepare template directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;
