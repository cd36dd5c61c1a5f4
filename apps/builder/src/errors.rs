use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::document::EditError;
use crate::export::ExportError;
use crate::remote::RemoteError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Converter unavailable: {0}")]
    ConverterUnavailable(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        match e {
            EditError::IndexOutOfBounds { .. } => AppError::NotFound(e.to_string()),
            _ => AppError::Validation(e.to_string()),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::NoExperience => AppError::Validation(e.user_message()),
            AnalysisError::Remote(e) => AppError::Remote(e),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::UnknownFormat(_) => AppError::Validation(e.to_string()),
            ExportError::ConverterUnavailable(_) => AppError::ConverterUnavailable(e.to_string()),
            ExportError::ConverterFailed(_) | ExportError::Io(_) => AppError::Export(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Remote(e) => {
                tracing::warn!("Remote service error: {e}");
                (StatusCode::BAD_GATEWAY, "REMOTE_ERROR", e.user_message())
            }
            AppError::ConverterUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CONVERTER_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::Export(msg) => {
                tracing::error!("Export error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    "The document could not be exported".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
