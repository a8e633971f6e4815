use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::template::TemplateError;
use crate::transform::TransformError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("Rendered output is not valid JSON: {0}")]
    InvalidOutput(#[source] serde_json::Error),

    #[error("Rendered output is not a JSON object: got {0}")]
    OutputNotObject(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    /// Stable identifier for logs
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Transform(TransformError::MalformedInput(_)) => "MALFORMED_INPUT",
            AppError::Transform(TransformError::Conversion(_)) => "CONVERSION_ERROR",
            AppError::Transform(TransformError::Template(e)) => match e {
                TemplateError::NotFound(_) => "TEMPLATE_NOT_FOUND",
                TemplateError::Syntax { .. } => "TEMPLATE_SYNTAX_ERROR",
                TemplateError::Render { .. } => "RENDERING_ERROR",
                TemplateError::Io { .. } | TemplateError::Directory { .. } => "TEMPLATE_IO_ERROR",
            },
            AppError::InvalidOutput(_) | AppError::OutputNotObject(_) => "OUTPUT_NOT_JSON",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Bad input and server misconfiguration are reported alike
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let message = self.to_string();

        tracing::error!(
            code = %self.code(),
            status = %status.as_u16(),
            message = %message,
            "Error during transformation"
        );

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
