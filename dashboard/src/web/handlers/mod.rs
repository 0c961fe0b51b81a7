//! Request handlers
//!
//! REST API, export downloads and the live-update WebSocket

pub mod api;
pub mod export;
pub mod websocket;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::types::ExportArtifact;

/// Turn an artifact into an attachment download
pub fn download_response(artifact: ExportArtifact) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.body,
    )
        .into_response()
}
