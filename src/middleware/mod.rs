// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, API keys, response headers).

pub mod api_key;
pub mod auth;
pub mod headers;

pub use api_key::require_api_key;
pub use auth::{require_auth, AuthContext};
