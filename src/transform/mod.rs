//! JSON-in, template, JSON-out transformation.
//!
//! Input arrives either as a typed `CustomerInput` or as raw JSON text. Both are
//! turned into a `DataModel`, rendered through a named template and returned as
//! text for the transport layer to re-parse.

mod model;
mod service;

use thiserror::Error;

use crate::template::TemplateError;

pub use model::{AccountInfo, ContactPreferences, CustomerInput, PersonalInfo, ToDataModel};
pub use service::TransformService;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Malformed input JSON: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error("Cannot convert input to a data model: expected a JSON object, got {0}")]
    Conversion(&'static str),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
