// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API key gate for third-party catalog access.

use crate::error::AppError;
use crate::routes::envelope::QueryParams;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ApiKeyParams {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

/// Require `?apiKey=<key>` naming an active key, when enabled in config.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<ApiKeyParams>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.config.require_api_key {
        return Ok(next.run(request).await);
    }

    let key = params
        .api_key
        .as_deref()
        .filter(|k| crate::ids::is_object_id(k))
        .ok_or_else(|| AppError::BadRequest("invalid apikey".to_string()))?;

    let mut api_key = match state.db.get_api_key(key).await? {
        Some(k) if k.active => k,
        _ => {
            tracing::warn!(key, "Blocked catalog request with unknown or inactive API key");
            return Err(AppError::InvalidApiKey);
        }
    };

    api_key.last_access = crate::time_utils::now_rfc3339();
    if let Err(e) = state.db.set_api_key(&api_key).await {
        tracing::warn!(error = %e, app = %api_key.app_name, "Failed to record API key access");
    }

    tracing::debug!(app = %api_key.app_name, "API key accepted");
    Ok(next.run(request).await)
}
