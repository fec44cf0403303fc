// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;

/// Session token lifetime when `TOKEN_TTL_DAYS` is unset or unusable.
pub const DEFAULT_TOKEN_TTL_DAYS: u64 = 30;

/// Longest accepted session token lifetime, in days.
pub const MAX_TOKEN_TTL_DAYS: u64 = 3650;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Whether catalog routes require an `apiKey` query parameter
    pub require_api_key: bool,
    /// Lifetime of issued session tokens, in days
    pub token_ttl_days: u64,

    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_signing_key = env::var("JWT_SECRET")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_signing_key.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET", "must not be empty"));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            require_api_key: env::var("REQUIRE_API_KEY")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            token_ttl_days: parse_token_ttl(env::var("TOKEN_TTL_DAYS").ok().as_deref())?,
            jwt_signing_key: jwt_signing_key.into_bytes(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 5000,
            require_api_key: false,
            token_ttl_days: DEFAULT_TOKEN_TTL_DAYS,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }
}

/// Zero or unparseable values fall back to the default; values above
/// `MAX_TOKEN_TTL_DAYS` are a configuration error.
fn parse_token_ttl(value: Option<&str>) -> Result<u64, ConfigError> {
    match value.and_then(|v| v.trim().parse::<u64>().ok()) {
        Some(days) if days > MAX_TOKEN_TTL_DAYS => Err(ConfigError::Invalid(
            "TOKEN_TTL_DAYS",
            "must be at most 3650 days",
        )),
        Some(days) if days > 0 => Ok(days),
        _ => Ok(DEFAULT_TOKEN_TTL_DAYS),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
