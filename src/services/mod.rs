// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod password;

pub use catalog::{CatalogPage, CatalogParams, CatalogQuery};
pub use password::{hash_password, verify_password};
