//! Dashboard-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use shared::{AudienceId, SharedError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("Failed to create audience: {message}")]
    UploadFailed { message: String },

    #[error("Nothing to export: {reason}")]
    NothingToExport { reason: String },

    #[error("Audience not found: {id}")]
    AudienceNotFound { id: AudienceId },

    #[error("Invalid request format: {details}")]
    InvalidRequest { details: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

impl DashboardError {
    pub fn nothing_to_export(reason: impl Into<String>) -> Self {
        Self::NothingToExport { reason: reason.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::InvalidRequest { details: details.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Validation { .. } => StatusCode::BAD_REQUEST,
            DashboardError::InvalidRequest { .. } | DashboardError::SharedError(_) => StatusCode::BAD_REQUEST,
            DashboardError::JsonError(_) => StatusCode::BAD_REQUEST,
            DashboardError::NothingToExport { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            DashboardError::AudienceNotFound { .. } => StatusCode::NOT_FOUND,
            DashboardError::UploadFailed { .. } => StatusCode::BAD_GATEWAY,
            DashboardError::Config(_) | DashboardError::ServerStartup(_) | DashboardError::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the user; validation lists travel separately
    fn user_message(&self) -> String {
        match self {
            DashboardError::Validation { .. } => "Please fix the highlighted problems".to_string(),
            DashboardError::NothingToExport { reason } => reason.clone(),
            DashboardError::UploadFailed { .. } => "Failed to create audience. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            DashboardError::Validation { errors } => json!({
                "status": "error",
                "message": self.user_message(),
                "errors": errors,
            }),
            _ => json!({
                "status": "error",
                "message": self.user_message(),
            }),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(DashboardError::nothing_to_export("x").status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            DashboardError::AudienceNotFound { id: AudienceId(3) }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DashboardError::Validation { errors: vec!["bad".into()] }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(DashboardError::config("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display() {
        let err = DashboardError::Validation {
            errors: vec!["Audience name is required".into(), "Please upload a CSV file".into()],
        };
        assert_eq!(
            err.to_string(),
            "Validation failed: Audience name is required; Please upload a CSV file"
        );
    }
}
