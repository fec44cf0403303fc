// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Issuer claim on every session token.
pub const TOKEN_ISSUER: &str = "helloBourbon";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user document ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated identity, stored in request extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub username: String,
    /// The bearer token this request presented (needed for logout)
    pub token: String,
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let rest = header_value.strip_prefix("Bearer")?;
    // At least one whitespace character must separate scheme and token
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

/// Verify a token's signature, expiry and issuer and return its claims.
pub fn decode_jwt(token: &str, signing_key: &[u8]) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

/// Middleware that requires valid JWT authentication.
///
/// The token must verify, name an existing user, and still be listed in
/// that user's active tokens (logout removes it).
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)?;

    let claims = decode_jwt(&token, &state.config.jwt_signing_key)?;

    if !crate::ids::is_object_id(&claims.sub) {
        return Err(AppError::InvalidToken);
    }

    let user = state
        .db
        .get_user(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !user.has_token(&token) {
        tracing::debug!(user_id = %user.id, "Rejected revoked session token");
        return Err(AppError::Unauthorized);
    }

    request.extensions_mut().insert(AuthContext {
        user_id: user.id,
        username: user.username,
        token,
    });

    Ok(next.run(request).await)
}

/// Create a JWT for a user session.
///
/// Fails if `now + ttl_days` does not fit in the `exp` claim.
pub fn create_jwt(user_id: &str, signing_key: &[u8], ttl_days: u64) -> anyhow::Result<String> {
    use anyhow::Context;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let exp = ttl_days
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|ttl| now.checked_add(ttl))
        .and_then(|exp| usize::try_from(exp).ok())
        .with_context(|| format!("token lifetime of {} days is out of range", ttl_days))?;

    let claims = Claims {
        sub: user_id.to_string(),
        iss: TOKEN_ISSUER.to_string(),
        iat: usize::try_from(now)?,
        exp,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
