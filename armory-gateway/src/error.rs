//! Error types for the gateway crate.

use armory_core::CoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors that can occur during gateway request handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// Form input failed validation; the message is user-visible.
    #[error("{0}")]
    Validation(#[from] CoreError),

    /// The record is missing or belongs to someone else. Never
    /// distinguishes the two.
    #[error("not found")]
    NotFound,

    /// The request carried no resolvable session token.
    #[error("authentication required")]
    Unauthorized,

    /// An error propagated from the generator adapter.
    #[error("generator error: {0}")]
    Veil(#[from] armory_veil::VeilError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            // A hashing failure is an internal fault, not a form problem.
            GatewayError::Validation(CoreError::PasswordHash { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::Veil(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({"errors": [self.to_string()]}))).into_response()
    }
}
