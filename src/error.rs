// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Bad email or password")]
    BadCredentials,

    #[error("Missing or inactive API key")]
    InvalidApiKey,

    #[error("Access denied")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for the generic "not found" answer most lookups give.
    pub fn not_found() -> Self {
        AppError::NotFound("not found".to_string())
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized
            | AppError::InvalidToken
            | AppError::BadCredentials
            | AppError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Detail wrapper: clients read the reason from `data.data`.
#[derive(Serialize)]
struct ErrorDetail {
    data: String,
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    status: u16,
    message: &'static str,
    data: ErrorDetail,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Unauthorized => "unauthorized".to_string(),
            AppError::InvalidToken => "invalid token".to_string(),
            AppError::BadCredentials => "bad email or password".to_string(),
            AppError::InvalidApiKey => "unauthorized - requires valid api key".to_string(),
            AppError::Forbidden => "forbidden".to_string(),
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                "database error".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "internal error".to_string()
            }
        };

        let body = ErrorResponse {
            status: status.as_u16(),
            message: "error",
            data: ErrorDetail { data: detail },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
