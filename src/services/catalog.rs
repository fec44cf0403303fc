// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog search, sorting and pagination.
//!
//! Firestore has no substring matching, so the (small, read-only) catalog is
//! fetched and the query is evaluated here.

use crate::error::{AppError, Result};
use crate::models::Bourbon;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Bourbons per page.
pub const PAGE_SIZE: usize = 20;

/// Maximum accepted search string length.
const MAX_SEARCH_LEN: usize = 100;

/// Raw query parameters for `GET /api/bourbons`.
///
/// Kept as strings so malformed values produce our own 400 envelope.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub page: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
}

/// Sortable catalog fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Distiller,
    Bottler,
    Abv,
    Age,
    Price,
    Score,
}

impl FromStr for SortField {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortField::Title),
            "distiller" => Ok(SortField::Distiller),
            "bottler" => Ok(SortField::Bottler),
            "abv" | "abv_value" => Ok(SortField::Abv),
            "age" | "age_value" => Ok(SortField::Age),
            "price" | "price_value" => Ok(SortField::Price),
            "score" => Ok(SortField::Score),
            _ => Err(()),
        }
    }
}

/// Parsed `<field>_<direction>` sort parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Title,
            descending: false,
        }
    }
}

impl FromStr for SortSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || AppError::BadRequest("sort params in request were bad".to_string());

        // The direction is the last `_`-separated word; field names may
        // themselves contain underscores (`abv_value_desc`).
        let (field, direction) = s.rsplit_once('_').ok_or_else(bad)?;
        let is_word = |p: &str| {
            !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        };
        if !is_word(field) || !is_word(direction) {
            return Err(bad());
        }

        Ok(SortSpec {
            field: field.parse().map_err(|_| bad())?,
            descending: direction == "desc",
        })
    }
}

/// A validated catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// 1-indexed page number
    pub page: usize,
    pub sort: SortSpec,
    /// Lower-cased search needle; `None` matches everything
    pub search: Option<String>,
}

/// One page of catalog results.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CatalogPage {
    pub bourbons: Vec<Bourbon>,
    /// Total number of bourbons matching the search (all pages)
    pub total_records: usize,
}

impl CatalogQuery {
    pub fn from_params(params: &CatalogParams) -> Result<Self> {
        let page = match params.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| {
                    AppError::BadRequest("page must be a positive integer".to_string())
                })?,
        };

        let sort = match params.sort.as_deref().map(str::trim) {
            None | Some("") => SortSpec::default(),
            Some(raw) => raw.parse()?,
        };

        let search = match params.search.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) if raw.chars().count() > MAX_SEARCH_LEN => {
                return Err(AppError::BadRequest("search term too long".to_string()))
            }
            Some(raw) => Some(raw.to_lowercase()),
        };

        Ok(Self { page, sort, search })
    }

    /// Whether a bourbon matches the search term on title, bottler or distiller.
    pub fn matches(&self, bourbon: &Bourbon) -> bool {
        match &self.search {
            None => true,
            Some(needle) => [&bourbon.title, &bourbon.bottler, &bourbon.distiller]
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }

    /// Filter, sort and slice the catalog.
    pub fn apply(&self, catalog: Vec<Bourbon>) -> CatalogPage {
        let mut matched: Vec<Bourbon> = catalog.into_iter().filter(|b| self.matches(b)).collect();
        let total_records = matched.len();

        matched.sort_by(|a, b| {
            let primary = compare_by(self.sort.field, a, b);
            let primary = if self.sort.descending {
                primary.reverse()
            } else {
                primary
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });

        let start = (self.page - 1).saturating_mul(PAGE_SIZE);
        let bourbons = matched.into_iter().skip(start).take(PAGE_SIZE).collect();

        CatalogPage {
            bourbons,
            total_records,
        }
    }
}

fn compare_by(field: SortField, a: &Bourbon, b: &Bourbon) -> Ordering {
    fn text(a: &str, b: &str) -> Ordering {
        a.to_lowercase().cmp(&b.to_lowercase())
    }

    match field {
        SortField::Title => text(&a.title, &b.title),
        SortField::Distiller => text(&a.distiller, &b.distiller),
        SortField::Bottler => text(&a.bottler, &b.bottler),
        SortField::Abv => a.abv_value.total_cmp(&b.abv_value),
        SortField::Age => a.age_value.cmp(&b.age_value),
        SortField::Price => a.price_value.cmp(&b.price_value),
        // Unreviewed (or unscored) bourbons sort before any score
        SortField::Score => {
            let score = |x: &Bourbon| x.review.as_ref().and_then(|r| r.score_value());
            match (score(a), score(b)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
    }
}
