// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bourbon_api::config::Config;
use bourbon_api::db::FirestoreDb;
use bourbon_api::middleware::auth::TOKEN_ISSUER;
use bourbon_api::models::Bourbon;
use bourbon_api::routes::create_router;
use bourbon_api::AppState;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

/// A syntactically valid document ID that exists nowhere.
#[allow(dead_code)]
pub const UNKNOWN_ID: &str = "0123456789abcdef01234567";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Build the router around a config and database.
#[allow(dead_code)]
pub fn app_with(config: Config, db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState { config, db });
    (create_router(state.clone()), state)
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    app_with(Config::test_default(), test_db_offline())
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    app_with(Config::test_default(), test_db().await)
}

/// Sign a session token with arbitrary claims.
#[allow(dead_code)]
pub fn create_test_jwt(sub: &str, issuer: &str, ttl_secs: i64, signing_key: &[u8]) -> String {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        iss: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: sub.to_string(),
        iss: issuer.to_string(),
        exp: (now + ttl_secs) as usize,
        iat: now as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

/// A valid, day-long token for `sub` under the test config's key.
#[allow(dead_code)]
pub fn valid_jwt(sub: &str) -> String {
    create_test_jwt(
        sub,
        TOKEN_ISSUER,
        86400,
        &Config::test_default().jwt_signing_key,
    )
}

/// Send a request and decode the JSON body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Build a request with an optional JSON body and bearer token.
#[allow(dead_code)]
pub fn request(
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Raw emulator client, for writing documents the API treats as read-only.
#[allow(dead_code)]
pub async fn raw_emulator_client() -> firestore::FirestoreDb {
    let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
        Ok(gcloud_sdk::Token {
            token_type: "Bearer".to_string(),
            token: gcloud_sdk::SecretValue::new(
                "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                    .to_string()
                    .into(),
            ),
            expiry: chrono::Utc::now() + chrono::Duration::hours(1),
        })
    });

    firestore::FirestoreDb::with_options_token_source(
        firestore::FirestoreDbOptions::new("test-project".to_string()),
        gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
        gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
    )
    .await
    .expect("Failed to connect to Firestore emulator")
}

/// Insert a catalog entry with a fresh ID and return it.
#[allow(dead_code)]
pub async fn seed_bourbon(title: &str) -> Bourbon {
    let bourbon = Bourbon {
        id: bourbon_api::ids::new_object_id().unwrap(),
        title: title.to_string(),
        distiller: "Test Distillery".to_string(),
        bottler: "Test Bottling Co".to_string(),
        abv: "50%".to_string(),
        abv_value: 50.0,
        ..Default::default()
    };

    let _: () = raw_emulator_client()
        .await
        .fluent()
        .update()
        .in_col(bourbon_api::db::collections::BOURBONS)
        .document_id(&bourbon.id)
        .object(&bourbon)
        .execute()
        .await
        .expect("Failed to seed bourbon");

    bourbon
}
