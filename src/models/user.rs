// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use crate::models::list::{
    apply_to_ref, remove_ref, rename_ref, ListKind, ListRef, MembershipAction, UserCollectionRef,
    UserWishlistRef,
};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Owner pointer embedded in lists and reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserRef {
    pub id: String,
    pub username: String,
}

/// Bourbon membership pointer inside a list back-reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BourbonsRef {
    pub bourbon_id: String,
}

/// Back-reference to a review written by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserReviewRef {
    pub review_id: String,
    pub review_title: String,
}

/// An issued session token. Removing it revokes the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTokenRef {
    pub token: String,
}

/// User document stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Document ID
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    /// Lower-cased email, unique across users
    pub email: String,
    /// Argon2 PHC string
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub collections: Vec<UserCollectionRef>,
    #[serde(default)]
    pub wishlists: Vec<UserWishlistRef>,
    #[serde(default)]
    pub reviews: Vec<UserReviewRef>,
    #[serde(default)]
    pub tokens: Vec<UserTokenRef>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl User {
    /// A freshly registered user holding one session token.
    pub fn new(
        id: String,
        username: String,
        email: String,
        password_hash: String,
        token: String,
        now: &str,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            collections: Vec::new(),
            wishlists: Vec::new(),
            reviews: Vec::new(),
            tokens: vec![UserTokenRef { token }],
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn user_ref(&self) -> UserRef {
        UserRef {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t.token == token)
    }

    /// Store a new session token, first dropping stored tokens that
    /// `is_live` rejects (expired or signed with a retired key).
    pub fn add_token(&mut self, token: String, is_live: impl Fn(&str) -> bool) {
        self.tokens.retain(|t| is_live(&t.token));
        self.tokens.push(UserTokenRef { token });
    }

    /// Remove a session token. Returns false if it was not present.
    pub fn revoke_token(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t.token != token);
        self.tokens.len() != before
    }

    pub fn add_list_ref(&mut self, kind: ListKind, list_id: &str, name: &str) {
        match kind {
            ListKind::Collection => self
                .collections
                .push(UserCollectionRef::new(list_id, name)),
            ListKind::Wishlist => self.wishlists.push(UserWishlistRef::new(list_id, name)),
        }
    }

    pub fn rename_list_ref(&mut self, kind: ListKind, list_id: &str, name: &str) -> bool {
        match kind {
            ListKind::Collection => rename_ref(&mut self.collections, list_id, name),
            ListKind::Wishlist => rename_ref(&mut self.wishlists, list_id, name),
        }
    }

    pub fn remove_list_ref(&mut self, kind: ListKind, list_id: &str) -> bool {
        match kind {
            ListKind::Collection => remove_ref(&mut self.collections, list_id),
            ListKind::Wishlist => remove_ref(&mut self.wishlists, list_id),
        }
    }

    pub fn apply_list_membership(
        &mut self,
        kind: ListKind,
        list_id: &str,
        action: MembershipAction,
        bourbon_id: &str,
    ) -> bool {
        match kind {
            ListKind::Collection => {
                apply_to_ref(&mut self.collections, list_id, action, bourbon_id)
            }
            ListKind::Wishlist => apply_to_ref(&mut self.wishlists, list_id, action, bourbon_id),
        }
    }
}

/// Public view of a user (no password hash or tokens).
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub collections: Vec<UserCollectionRef>,
    pub reviews: Vec<UserReviewRef>,
    pub wishlists: Vec<UserWishlistRef>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            collections: user.collections,
            reviews: user.reviews,
            wishlists: user.wishlists,
        }
    }
}
