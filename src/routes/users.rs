// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and session routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, decode_jwt, AuthContext};
use crate::models::{User, UserResponse};
use crate::routes::envelope::{JsonBody, Success};
use crate::services::password::{hash_password_blocking, verify_password_blocking};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationErrors};

/// Routes open to anonymous callers.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/user", post(register))
        .route("/api/user/login", get(login).post(login))
}

/// Routes that need a session. The auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/user/logout", post(logout))
        .route("/api/user/me", get(get_me))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by register and login.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Turn validator output into the message clients see.
fn registration_error(errors: &ValidationErrors) -> AppError {
    let fields = errors.field_errors();
    let message = if fields.contains_key("email") {
        "user or email invalid"
    } else if fields.contains_key("password") {
        "password must be at least 6 characters"
    } else {
        "username must be between 1 and 50 characters"
    };
    AppError::BadRequest(message.to_string())
}

async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(mut req): JsonBody<RegisterRequest>,
) -> Result<Success<SessionResponse>> {
    req.username = req.username.trim().to_string();
    req.email = req.email.trim().to_lowercase();
    req.validate().map_err(|e| registration_error(&e))?;

    if state.db.find_user_by_email(&req.email).await?.is_some() {
        tracing::debug!("Registration rejected for existing email");
        return Err(AppError::BadRequest("user or email invalid".to_string()));
    }

    let password_hash = hash_password_blocking(req.password).await?;
    let user_id = crate::ids::new_object_id()?;
    let token = create_jwt(
        &user_id,
        &state.config.jwt_signing_key,
        state.config.token_ttl_days,
    )?;

    let user = User::new(
        user_id,
        req.username,
        req.email,
        password_hash,
        token.clone(),
        &now_rfc3339(),
    );
    state.db.create_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Success(SessionResponse {
        user: user.into(),
        token,
    }))
}

async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Success<SessionResponse>> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let user = state
        .db
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::BadCredentials)?;

    if !verify_password_blocking(req.password, user.password_hash.clone()).await {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AppError::BadCredentials);
    }

    let token = create_jwt(
        &user.id,
        &state.config.jwt_signing_key,
        state.config.token_ttl_days,
    )?;
    let signing_key = state.config.jwt_signing_key.clone();
    let user = state
        .db
        .add_session_token(&user.id, &token, move |t| {
            decode_jwt(t, &signing_key).is_ok()
        })
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Success(SessionResponse {
        user: user.into(),
        token,
    }))
}

/// Revoke the token this request was made with.
async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Success<&'static str>> {
    if !state
        .db
        .revoke_session_token(&auth.user_id, &auth.token)
        .await?
    {
        return Err(AppError::BadRequest("token not found".to_string()));
    }

    tracing::info!(user_id = %auth.user_id, "User logged out");
    Ok(Success("logged out"))
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Success<UserResponse>> {
    let user = state
        .db
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", auth.user_id)))?;

    Ok(Success(user.into()))
}
