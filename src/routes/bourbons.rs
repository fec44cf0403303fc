// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog routes.

use crate::error::{AppError, Result};
use crate::ids::{parse_object_id, random_index};
use crate::models::Bourbon;
use crate::routes::envelope::{QueryParams, Success};
use crate::services::{CatalogPage, CatalogParams, CatalogQuery};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use std::sync::Arc;

/// Catalog routes. The API key gate is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bourbons", get(list_bourbons))
        .route("/api/bourbons/random", get(random_bourbon))
        .route("/api/bourbons/{id}", get(get_bourbon))
}

/// Search, sort and page through the catalog.
async fn list_bourbons(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<CatalogParams>,
) -> Result<Success<CatalogPage>> {
    let query = CatalogQuery::from_params(&params)?;

    let catalog = state.db.list_bourbons().await?;
    let page = query.apply(catalog);

    tracing::debug!(
        page = query.page,
        search = ?query.search,
        total = page.total_records,
        "Catalog page"
    );

    if page.bourbons.is_empty() {
        return Err(AppError::not_found());
    }

    Ok(Success(page))
}

async fn random_bourbon(State(state): State<Arc<AppState>>) -> Result<Success<Bourbon>> {
    let mut catalog = state.db.list_bourbons().await?;
    if catalog.is_empty() {
        return Err(AppError::not_found());
    }

    let index = random_index(catalog.len())?;
    Ok(Success(catalog.swap_remove(index)))
}

async fn get_bourbon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Success<Bourbon>> {
    let id = parse_object_id(&id)?;

    let bourbon = state
        .db
        .get_bourbon(&id)
        .await?
        .ok_or_else(AppError::not_found)?;

    Ok(Success(bourbon))
}
