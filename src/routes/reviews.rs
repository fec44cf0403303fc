// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Review routes.

use crate::error::{AppError, Result};
use crate::ids::{new_object_id, parse_object_id};
use crate::middleware::auth::AuthContext;
use crate::models::{UserRef, UserReview, UserReviewRef};
use crate::routes::envelope::{JsonBody, Success};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/review/{id}", get(get_review))
        .route("/api/reviews/{filter}/{id}", get(get_reviews))
}

/// Authenticated review routes. The auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/review", post(create_review))
}

/// Body of `POST /api/review`.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub bourbon_id: String,
    #[serde(rename = "reviewTitle", default)]
    pub review_title: String,
    #[serde(rename = "reviewScore", default)]
    pub review_score: String,
    #[serde(rename = "reviewText", default)]
    pub review_text: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ReviewResponse {
    pub review: UserReview,
    pub user_reviews: Vec<UserReviewRef>,
}

/// Which side of a review `GET /api/reviews/{filter}/{id}` looks up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReviewFilter {
    Bourbon,
    User,
}

impl ReviewFilter {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "bourbon" => Some(ReviewFilter::Bourbon),
            "user" => Some(ReviewFilter::User),
            _ => None,
        }
    }
}

async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Success<UserReview>> {
    let id = parse_object_id(&id)?;

    let review = state
        .db
        .get_review(&id)
        .await?
        .ok_or_else(AppError::not_found)?;

    Ok(Success(review))
}

async fn get_reviews(
    State(state): State<Arc<AppState>>,
    Path((filter, id)): Path<(String, String)>,
) -> Result<Success<Vec<UserReview>>> {
    let filter = ReviewFilter::parse(&filter).ok_or_else(AppError::not_found)?;
    let id = parse_object_id(&id)?;

    let reviews = match filter {
        ReviewFilter::Bourbon => state.db.reviews_for_bourbon(&id).await?,
        ReviewFilter::User => state.db.reviews_by_user(&id).await?,
    };

    if reviews.is_empty() {
        return Err(AppError::not_found());
    }
    Ok(Success(reviews))
}

async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    JsonBody(req): JsonBody<CreateReviewRequest>,
) -> Result<Success<ReviewResponse>> {
    let bourbon_id = parse_object_id(&req.bourbon_id)?;
    let title = req.review_title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("review title is required".to_string()));
    }

    let bourbon = state
        .db
        .get_bourbon(&bourbon_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("bourbon {} not found", bourbon_id)))?;

    let review = UserReview {
        id: new_object_id()?,
        user: UserRef {
            id: auth.user_id,
            username: auth.username,
        },
        bourbon_name: bourbon.title,
        bourbon_id,
        review_title: title.to_string(),
        review_score: req.review_score.trim().to_string(),
        review_text: req.review_text,
        created_at: now_rfc3339(),
    };

    let author = state.db.create_review(&review).await?;

    Ok(Success(ReviewResponse {
        review,
        user_reviews: author.reviews,
    }))
}
