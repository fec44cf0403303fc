// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end tests against the Firestore emulator.
//!
//! Run with FIRESTORE_EMULATOR_HOST set; skipped otherwise.

use axum::http::StatusCode;
use bourbon_api::error::AppError;
use bourbon_api::models::{ListKind, MembershipAction, User};
use futures_util::future::join_all;
use serde_json::json;

mod common;

async fn call(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    token: &str,
) -> (StatusCode, serde_json::Value) {
    common::send(app, common::request(method, uri, body, Some(token))).await
}

const PASSWORD: &str = "bottled-in-bond";

/// Register a user with a unique email; returns (user_id, token).
async fn register(app: &axum::Router, name: &str) -> (String, String) {
    register_as(app, name, &unique_email(name)).await
}

fn unique_email(name: &str) -> String {
    let id = bourbon_api::ids::new_object_id().unwrap();
    format!("{}-{}@example.com", name, id)
}

async fn register_as(app: &axum::Router, name: &str, email: &str) -> (String, String) {
    let (status, body) = common::send(
        app,
        common::request(
            "POST",
            "/api/user",
            Some(json!({"username": name, "email": email, "password": PASSWORD})),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    (
        body["data"]["user"]["_id"].as_str().unwrap().to_string(),
        body["data"]["token"].as_str().unwrap().to_string(),
    )
}

async fn login(app: &axum::Router, method: &str, email: &str) -> (StatusCode, serde_json::Value) {
    common::send(
        app,
        common::request(
            method,
            "/api/user/login",
            Some(json!({"email": email, "password": PASSWORD})),
            None,
        ),
    )
    .await
}

async fn create_collection(app: &axum::Router, token: &str, name: &str) -> StatusCode {
    let (status, _) = call(
        app,
        "POST",
        "/api/collection",
        Some(json!({"name": name})),
        token,
    )
    .await;
    status
}

#[tokio::test]
async fn test_register_login_logout() {
    require_emulator!();
    let (app, state) = common::create_emulator_app().await;

    let id = bourbon_api::ids::new_object_id().unwrap();
    let email = format!("pat-{}@example.com", id);
    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            "/api/user",
            Some(json!({
                "username": "pat",
                "email": email.to_uppercase(),
                "password": "secret1"
            })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], email);
    assert!(body["data"]["user"].get("password").is_none());
    let first_token = body["data"]["token"].as_str().unwrap().to_string();

    // Same email again, any case
    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            "/api/user",
            Some(json!({"username": "pat2", "email": email, "password": "secret1"})),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["data"], "user or email invalid");

    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            "/api/user/login",
            Some(json!({"email": email, "password": "wrong-password"})),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"]["data"], "bad email or password");

    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            "/api/user/login",
            Some(json!({"email": email, "password": "secret1"})),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let second_token = body["data"]["token"].as_str().unwrap().to_string();
    let user_id = body["data"]["user"]["_id"].as_str().unwrap().to_string();

    let user = state.db.get_user(&user_id).await.unwrap().unwrap();
    assert_eq!(user.tokens.len(), 2);

    let (status, body) = common::send(
        &app,
        common::request("POST", "/api/user/logout", None, Some(&second_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "logged out");

    // Revoked token no longer authenticates; the other session survives
    let (status, _) = common::send(
        &app,
        common::request("GET", "/api/user/me", None, Some(&second_token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = common::send(
        &app,
        common::request("GET", "/api/user/me", None, Some(&first_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "pat");
}

#[tokio::test]
async fn test_collection_lifecycle() {
    require_emulator!();
    let (app, state) = common::create_emulator_app().await;
    let bourbon = common::seed_bourbon("Old Lifecycle 10 Year").await;
    let (user_id, token) = register(&app, "casey").await;

    // Create with default name
    let (status, body) = common::send(
        &app,
        common::request("POST", "/api/collection", Some(json!({})), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["collection"]["name"], "My Collection");
    assert_eq!(body["data"]["user_collections"].as_array().unwrap().len(), 1);
    let list_id = body["data"]["collection"]["_id"].as_str().unwrap().to_string();

    let add_uri = format!("/api/collection/add/{}/{}", list_id, bourbon.id);
    let (status, body) = call(&app, "POST", &add_uri, None, &token).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["collection"]["bourbons"][0]["title"], bourbon.title);
    assert_eq!(
        body["data"]["user_collections"][0]["bourbons"][0]["bourbon_id"],
        bourbon.id
    );

    // Adding twice is not a valid action
    let (status, body) = call(&app, "POST", &add_uri, None, &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["data"], "action not valid");

    // Unknown bourbon is checked before the list
    let uri = format!("/api/collection/add/{}/{}", list_id, common::UNKNOWN_ID);
    let (status, _) = call(&app, "POST", &uri, None, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/collection/update/{}", list_id);
    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            &uri,
            Some(json!({"name": "Top Shelf", "private": true})),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["collection"]["private"], true);
    assert_eq!(
        body["data"]["user_collections"][0]["collection_name"],
        "Top Shelf"
    );

    // Someone else cannot see, modify or delete it
    let (_, other_token) = register(&app, "riley").await;
    let get_uri = format!("/api/collection/{}", list_id);
    let (status, _) = call(&app, "GET", &get_uri, None, &other_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, "POST", &uri, Some(json!({})), &other_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = call(&app, "DELETE", &get_uri, None, &other_token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["data"], "bad request");

    let remove_uri = format!("/api/collection/delete/{}/{}", list_id, bourbon.id);
    let (status, body) = call(&app, "DELETE", &remove_uri, None, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["collection"]["bourbons"].as_array().unwrap().is_empty());
    assert!(body["data"]["user_collections"][0]["bourbons"]
        .as_array()
        .unwrap()
        .is_empty());

    let (status, body) = call(&app, "GET", "/api/collections", None, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["collections"].as_array().unwrap().len(), 1);

    let (status, body) = call(&app, "DELETE", &get_uri, None, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["user_collections"].as_array().unwrap().is_empty());

    assert!(state
        .db
        .get_list(ListKind::Collection, &list_id)
        .await
        .unwrap()
        .is_none());
    let user = state.db.get_user(&user_id).await.unwrap().unwrap();
    assert!(user.collections.is_empty());
}

#[tokio::test]
async fn test_wishlist_membership_keeps_back_reference_in_sync() {
    require_emulator!();
    let (app, state) = common::create_emulator_app().await;
    let db = &state.db;
    let first = common::seed_bourbon("Wishlist Pick A").await;
    let second = common::seed_bourbon("Wishlist Pick B").await;
    let (user_id, _) = register(&app, "morgan").await;

    let (list, _) = db
        .create_list(ListKind::Wishlist, &user_id, "Someday", false)
        .await
        .unwrap();

    for bourbon in [&first, &second] {
        db.update_list_membership(
            ListKind::Wishlist,
            &list.id,
            &bourbon.id,
            &user_id,
            MembershipAction::Add,
        )
        .await
        .unwrap();
    }
    let (list, owner) = db
        .update_list_membership(
            ListKind::Wishlist,
            &list.id,
            &first.id,
            &user_id,
            MembershipAction::Delete,
        )
        .await
        .unwrap();

    let stored = db.get_list(ListKind::Wishlist, &list.id).await.unwrap().unwrap();
    assert_eq!(stored.bourbons, vec![second.clone()]);
    assert_eq!(list.bourbons, stored.bourbons);

    let refs: Vec<&str> = owner.wishlists[0]
        .bourbons
        .iter()
        .map(|b| b.bourbon_id.as_str())
        .collect();
    assert_eq!(refs, vec![second.id.as_str()]);

    let reloaded = db.get_user(&user_id).await.unwrap().unwrap();
    assert_eq!(reloaded.wishlists, owner.wishlists);
    // Wishlists never leak into collections
    assert!(reloaded.collections.is_empty());
}

#[tokio::test]
async fn test_one_review_per_user_per_bourbon() {
    require_emulator!();
    let (app, _) = common::create_emulator_app().await;
    let bourbon = common::seed_bourbon("Reviewed Reserve").await;
    let (user_id, token) = register(&app, "jordan").await;

    let review = json!({
        "bourbon_id": bourbon.id,
        "reviewTitle": "Caramel bomb",
        "reviewScore": "9",
        "reviewText": "Long finish."
    });

    let (status, body) = common::send(
        &app,
        common::request("POST", "/api/review", Some(review.clone()), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["review"]["bourbonName"], bourbon.title);
    assert_eq!(body["data"]["review"]["user"]["id"], user_id);
    assert_eq!(body["data"]["user_reviews"][0]["review_title"], "Caramel bomb");
    let review_id = body["data"]["review"]["_id"].as_str().unwrap().to_string();

    let (status, body) = common::send(
        &app,
        common::request("POST", "/api/review", Some(review), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["data"], "user already reviewed this bourbon");

    let (status, body) = common::send(
        &app,
        common::request("GET", &format!("/api/review/{}", review_id), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reviewTitle"], "Caramel bomb");

    for filter_uri in [
        format!("/api/reviews/bourbon/{}", bourbon.id),
        format!("/api/reviews/user/{}", user_id),
    ] {
        let (status, body) =
            common::send(&app, common::request("GET", &filter_uri, None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    let (status, _) = common::send(
        &app,
        common::request(
            "POST",
            "/api/review",
            Some(json!({"bourbon_id": common::UNKNOWN_ID, "reviewTitle": "Ghost"})),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_search_and_lookup() {
    require_emulator!();
    let (app, _) = common::create_emulator_app().await;
    let marker = bourbon_api::ids::new_object_id().unwrap();
    let bourbon = common::seed_bourbon(&format!("Searchable {}", marker)).await;

    let uri = format!("/api/bourbons?search={}", marker.to_uppercase());
    let (status, body) = common::send(&app, common::request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_records"], 1);
    assert_eq!(body["data"]["bourbons"][0]["_id"], bourbon.id);

    let (status, body) = common::send(
        &app,
        common::request("GET", &format!("/api/bourbons/{}", bourbon.id), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], bourbon.title);

    let (status, body) = common::send(
        &app,
        common::request("GET", "/api/bourbons/random", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["_id"].is_string());

    // Far past the last page
    let (status, _) = common::send(
        &app,
        common::request("GET", "/api/bourbons?page=100000", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_reads() {
    require_emulator!();
    let (app, _) = common::create_emulator_app().await;
    let (user_id, token) = register(&app, "avery").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/wishlist",
        Some(json!({"name": "Unicorns", "private": true})),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let list_id = body["data"]["wishlist"]["_id"].as_str().unwrap().to_string();

    // Private lists stay visible to their owner
    let (status, body) = call(&app, "GET", &format!("/api/wishlist/{}", list_id), None, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Unicorns");
    assert_eq!(body["data"]["private"], true);
    assert_eq!(body["data"]["user"]["id"], user_id);

    let (status, body) = call(&app, "GET", "/api/wishlists", None, &token).await;
    assert_eq!(status, StatusCode::OK);
    let wishlists = body["data"]["wishlists"].as_array().unwrap();
    assert_eq!(wishlists.len(), 1);
    assert_eq!(wishlists[0]["_id"], list_id.as_str());
    assert!(body["data"].get("collections").is_none());

    for kind in ["collection", "wishlist"] {
        let uri = format!("/api/{}/{}", kind, common::UNKNOWN_ID);
        let (status, body) = call(&app, "GET", &uri, None, &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["message"], "error");
    }
}

#[tokio::test]
async fn test_login_accepts_get() {
    require_emulator!();
    let (app, state) = common::create_emulator_app().await;
    let email = unique_email("quinn");
    let (user_id, _) = register_as(&app, "quinn", &email).await;

    let (status, body) = login(&app, "GET", &email).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["user"]["_id"], user_id.as_str());
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let user = state.db.get_user(&user_id).await.unwrap().unwrap();
    assert!(user.has_token(&token));

    let (status, body) = call(&app, "GET", "/api/user/me", None, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "quinn");
}

#[tokio::test]
async fn test_concurrent_list_creates_and_login_keep_every_write() {
    require_emulator!();
    let (app, state) = common::create_emulator_app().await;
    let email = unique_email("drew");
    let (user_id, token) = register_as(&app, "drew", &email).await;

    let names: Vec<String> = (0..8).map(|i| format!("Shelf {}", i)).collect();
    let creates = join_all(names.iter().map(|name| create_collection(&app, &token, name)));
    let (statuses, (login_status, login_body)) =
        futures_util::join!(creates, login(&app, "POST", &email));

    assert!(statuses.iter().all(|s| *s == StatusCode::OK), "{:?}", statuses);
    assert_eq!(login_status, StatusCode::OK, "{}", login_body);
    let login_token = login_body["data"]["token"].as_str().unwrap().to_string();

    let user = state.db.get_user(&user_id).await.unwrap().unwrap();
    let lists = state
        .db
        .get_lists_for_user(ListKind::Collection, &user_id)
        .await
        .unwrap();
    assert_eq!(lists.len(), names.len());
    assert_eq!(user.collections.len(), names.len());
    assert!(user.has_token(&token));
    assert!(user.has_token(&login_token));

    let (status, _) = call(&app, "GET", "/api/user/me", None, &login_token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_survives_concurrent_list_creates() {
    require_emulator!();
    let (app, state) = common::create_emulator_app().await;
    let email = unique_email("emery");
    let (user_id, token) = register_as(&app, "emery", &email).await;
    let (status, body) = login(&app, "POST", &email).await;
    assert_eq!(status, StatusCode::OK);
    let doomed = body["data"]["token"].as_str().unwrap().to_string();

    let names: Vec<String> = (0..4).map(|i| format!("Bunker {}", i)).collect();
    let creates = join_all(names.iter().map(|name| create_collection(&app, &token, name)));
    let (statuses, (logout_status, _)) =
        futures_util::join!(creates, call(&app, "POST", "/api/user/logout", None, &doomed));

    assert!(statuses.iter().all(|s| *s == StatusCode::OK), "{:?}", statuses);
    assert_eq!(logout_status, StatusCode::OK);

    let (status, _) = call(&app, "GET", "/api/user/me", None, &doomed).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = state.db.get_user(&user_id).await.unwrap().unwrap();
    assert!(!user.has_token(&doomed));
    assert_eq!(user.collections.len(), names.len());
}

#[tokio::test]
async fn test_concurrent_reviews_of_one_bourbon() {
    require_emulator!();
    let (app, state) = common::create_emulator_app().await;
    let bourbon = common::seed_bourbon("Contested Barrel").await;
    let (user_id, token) = register(&app, "harper").await;

    let review = json!({"bourbon_id": bourbon.id, "reviewTitle": "Twice?"});
    let attempts = join_all((0..3).map(|_| {
        call(&app, "POST", "/api/review", Some(review.clone()), &token)
    }))
    .await;

    let accepted = attempts.iter().filter(|(s, _)| *s == StatusCode::OK).count();
    assert_eq!(accepted, 1, "{:?}", attempts);

    let reviews = state.db.reviews_by_user(&user_id).await.unwrap();
    assert_eq!(reviews.len(), 1);
    let user = state.db.get_user(&user_id).await.unwrap().unwrap();
    assert_eq!(user.reviews.len(), 1);
}

#[tokio::test]
async fn test_create_user_never_overwrites() {
    require_emulator!();
    let db = common::test_db().await;
    let id = bourbon_api::ids::new_object_id().unwrap();

    let original = User::new(
        id.clone(),
        "first".into(),
        unique_email("first"),
        "hash".into(),
        "token".into(),
        "2026-01-01T00:00:00Z",
    );
    db.create_user(&original).await.unwrap();

    let imposter = User::new(
        id.clone(),
        "second".into(),
        unique_email("second"),
        "other-hash".into(),
        "other-token".into(),
        "2026-01-02T00:00:00Z",
    );
    let err = db.create_user(&imposter).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{:?}", err);

    let stored = db.get_user(&id).await.unwrap().unwrap();
    assert_eq!(stored.username, "first");
    assert!(stored.has_token("token"));
}
