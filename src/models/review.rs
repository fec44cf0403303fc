// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-written bourbon reviews.

use crate::models::user::UserRef;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Review document stored in the `reviews` collection.
///
/// Field names follow the JSON the frontend already sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserReview {
    #[serde(rename = "_id")]
    pub id: String,
    /// Author
    pub user: UserRef,
    #[serde(rename = "bourbonName")]
    pub bourbon_name: String,
    pub bourbon_id: String,
    #[serde(rename = "reviewTitle")]
    pub review_title: String,
    #[serde(rename = "reviewScore", default)]
    pub review_score: String,
    #[serde(rename = "reviewText", default)]
    pub review_text: String,
    #[serde(default)]
    pub created_at: String,
}
