// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! bourbon-api: REST backend for a bourbon catalog
//!
//! Users browse the catalog, keep collections and wishlists of bourbons,
//! and write reviews. Data lives in Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
}
