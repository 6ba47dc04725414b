//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use crate::gateway::GatewayError;
use crate::studio::StudioError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Channel with the given ID was not found
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// Request body failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Studio command was rejected
    #[error(transparent)]
    Studio(#[from] StudioError),

    /// The generative model call failed
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The project has no listing yet
    #[error("No listing has been generated yet")]
    NoListing,

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ChannelNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Studio(StudioError::EmptyProductName) => StatusCode::BAD_REQUEST,
            AppError::Studio(StudioError::SceneNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Studio(StudioError::RunInProgress)
            | AppError::Studio(StudioError::NotIdle)
            | AppError::Studio(StudioError::SceneBusy(_)) => StatusCode::CONFLICT,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::NoListing => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::Gateway(e) => json!({
                "error": self.to_string(),
                "status": status.as_u16(),
                "kind": e.kind(),
            }),
            _ => json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            }),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        }

        (status, Json(body)).into_response()
    }
}
