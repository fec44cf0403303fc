// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bourbon catalog model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Tasting notes attached to a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Review {
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub nose: String,
    #[serde(default)]
    pub taste: String,
    #[serde(default)]
    pub finish: String,
    #[serde(default)]
    pub overall: String,
    /// Score as published, e.g. "86"
    #[serde(default)]
    pub score: String,
    #[serde(default)]
    pub author: String,
}

impl Review {
    /// Numeric score, if the published score parses as one.
    pub fn score_value(&self) -> Option<f64> {
        self.score.trim().parse().ok()
    }
}

/// Catalog entry stored in the `bourbons` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Bourbon {
    /// Document ID
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub distiller: String,
    #[serde(default)]
    pub bottler: String,
    /// Display ABV, e.g. "50%"
    #[serde(default)]
    pub abv: String,
    #[serde(default)]
    pub abv_value: f64,
    /// Display age, e.g. "4 Years"
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub age_value: i64,
    #[serde(default)]
    pub price_array: Vec<String>,
    #[serde(default)]
    pub price_value: i64,
    #[serde(default)]
    pub review: Option<Review>,
}
