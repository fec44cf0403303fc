// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore).

pub mod firestore;
mod lists;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Read-only bourbon catalog
    pub const BOURBONS: &str = "bourbons";
    pub const USERS: &str = "users";
    pub const COLLECTIONS: &str = "collections";
    pub const WISHLISTS: &str = "wishlists";
    pub const REVIEWS: &str = "reviews";
    /// API keys (document ID is the key)
    pub const KEYS: &str = "keys";
}
