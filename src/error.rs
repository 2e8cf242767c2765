use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to fetch document {document_id} ({document_type}): {reason}")]
    RemoteFetch {
        document_id: String,
        document_type: String,
        reason: String,
    },

    #[error("Malformed document, field '{field}': {reason}")]
    MalformedDocument { field: String, reason: String },

    #[error("MT700 synthesis failed: {reason}")]
    Synthesis { reason: String },

    #[error("Invalid input: {0}")]
    ValidationError(String),
}

impl AppError {
    /// Stable snake-case tag, used in response bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::RemoteFetch { .. } => "remote_fetch",
            AppError::MalformedDocument { .. } => "malformed_document",
            AppError::Synthesis { .. } => "synthesis",
            AppError::ValidationError(_) => "validation",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RemoteFetch { .. }
            | AppError::MalformedDocument { .. }
            | AppError::Synthesis { .. } => StatusCode::BAD_GATEWAY,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
    code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::ValidationError(msg) => {
                tracing::warn!(error = %msg, "Validation error");
            }
            _ => {
                tracing::error!(kind = self.kind(), error = %self, "Upstream pipeline error");
            }
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            kind: self.kind(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
