// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod api_key;
pub mod bourbon;
pub mod list;
pub mod review;
pub mod user;

pub use api_key::ApiKey;
pub use bourbon::{Bourbon, Review};
pub use list::{
    Collection, ListKind, ListRef, MembershipAction, UserCollectionRef, UserWishlistRef,
};
pub use review::UserReview;
pub use user::{BourbonsRef, User, UserRef, UserResponse, UserReviewRef, UserTokenRef};
