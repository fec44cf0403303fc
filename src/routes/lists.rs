// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection and wishlist routes.
//!
//! Both kinds share handlers; each kind's router carries its `ListKind`
//! as an extension.

use crate::error::{AppError, Result};
use crate::ids::parse_object_id;
use crate::middleware::auth::AuthContext;
use crate::models::{
    Collection, ListKind, MembershipAction, User, UserCollectionRef, UserWishlistRef,
};
use crate::routes::envelope::{JsonBody, Success};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Longest accepted list name, in characters.
const MAX_NAME_LEN: usize = 100;

/// List routes for both kinds. The auth middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    ListKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| router.merge(kind_routes(kind)))
}

fn kind_routes(kind: ListKind) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("/api/{kind}s"), get(get_lists))
        .route(&format!("/api/{kind}"), post(create_list))
        .route(
            &format!("/api/{kind}/{{id}}"),
            get(get_list).delete(delete_list),
        )
        .route(&format!("/api/{kind}/update/{{id}}"), post(update_list))
        .route(
            &format!("/api/{kind}/add/{{list_id}}/{{bourbon_id}}"),
            post(add_bourbon).delete(add_bourbon),
        )
        .route(
            &format!("/api/{kind}/delete/{{list_id}}/{{bourbon_id}}"),
            post(remove_bourbon).delete(remove_bourbon),
        )
        .layer(Extension(kind))
}

// ─── Request / Response Types ────────────────────────────────

/// Body for create and update.
#[derive(Debug, Default, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub private: Option<bool>,
}

impl ListRequest {
    /// Resolve the name to store, applying the per-kind default.
    fn name_for(&self, kind: ListKind) -> Result<String> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Ok(kind.default_name().to_string());
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::BadRequest(format!(
                "name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        Ok(name.to_string())
    }
}

/// A list together with the owner's back-references of the same kind.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListWithRefs {
    Collection {
        collection: Collection,
        user_collections: Vec<UserCollectionRef>,
    },
    Wishlist {
        wishlist: Collection,
        user_wishlists: Vec<UserWishlistRef>,
    },
}

impl ListWithRefs {
    fn new(kind: ListKind, list: Collection, owner: User) -> Self {
        match kind {
            ListKind::Collection => ListWithRefs::Collection {
                collection: list,
                user_collections: owner.collections,
            },
            ListKind::Wishlist => ListWithRefs::Wishlist {
                wishlist: list,
                user_wishlists: owner.wishlists,
            },
        }
    }
}

/// The owner's back-references after a delete.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RemainingRefs {
    Collections {
        user_collections: Vec<UserCollectionRef>,
    },
    Wishlists {
        user_wishlists: Vec<UserWishlistRef>,
    },
}

impl RemainingRefs {
    fn new(kind: ListKind, owner: User) -> Self {
        match kind {
            ListKind::Collection => RemainingRefs::Collections {
                user_collections: owner.collections,
            },
            ListKind::Wishlist => RemainingRefs::Wishlists {
                user_wishlists: owner.wishlists,
            },
        }
    }
}

/// Every list of one kind owned by the caller.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OwnedLists {
    Collections { collections: Vec<Collection> },
    Wishlists { wishlists: Vec<Collection> },
}

impl OwnedLists {
    fn new(kind: ListKind, lists: Vec<Collection>) -> Self {
        match kind {
            ListKind::Collection => OwnedLists::Collections { collections: lists },
            ListKind::Wishlist => OwnedLists::Wishlists { wishlists: lists },
        }
    }
}

// ─── Handlers ────────────────────────────────────────────────

async fn get_list(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ListKind>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Success<Collection>> {
    let id = parse_object_id(&id)?;

    let list = state
        .db
        .get_list(kind, &id)
        .await?
        .ok_or_else(AppError::not_found)?;

    if !list.is_visible_to(&auth.user_id) {
        tracing::debug!(
            kind = %kind,
            list_id = %id,
            user_id = %auth.user_id,
            "Private list hidden"
        );
        return Err(AppError::Unauthorized);
    }

    Ok(Success(list))
}

async fn get_lists(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ListKind>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Success<OwnedLists>> {
    let lists = state.db.get_lists_for_user(kind, &auth.user_id).await?;
    Ok(Success(OwnedLists::new(kind, lists)))
}

async fn create_list(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ListKind>,
    Extension(auth): Extension<AuthContext>,
    JsonBody(req): JsonBody<ListRequest>,
) -> Result<Success<ListWithRefs>> {
    let name = req.name_for(kind)?;

    let (list, owner) = state
        .db
        .create_list(kind, &auth.user_id, &name, req.private.unwrap_or(false))
        .await?;

    Ok(Success(ListWithRefs::new(kind, list, owner)))
}

async fn update_list(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ListKind>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ListRequest>,
) -> Result<Success<ListWithRefs>> {
    let id = parse_object_id(&id)?;
    let name = req.name_for(kind)?;

    let (list, owner) = state
        .db
        .update_list(kind, &id, &auth.user_id, &name, req.private.unwrap_or(false))
        .await?;

    Ok(Success(ListWithRefs::new(kind, list, owner)))
}

async fn delete_list(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ListKind>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Success<RemainingRefs>> {
    let id = parse_object_id(&id)?;
    let owner = state.db.delete_list(kind, &id, &auth.user_id).await?;
    Ok(Success(RemainingRefs::new(kind, owner)))
}

async fn add_bourbon(
    state: State<Arc<AppState>>,
    kind: Extension<ListKind>,
    auth: Extension<AuthContext>,
    ids: Path<(String, String)>,
) -> Result<Success<ListWithRefs>> {
    change_membership(state, kind, auth, ids, MembershipAction::Add).await
}

async fn remove_bourbon(
    state: State<Arc<AppState>>,
    kind: Extension<ListKind>,
    auth: Extension<AuthContext>,
    ids: Path<(String, String)>,
) -> Result<Success<ListWithRefs>> {
    change_membership(state, kind, auth, ids, MembershipAction::Delete).await
}

async fn change_membership(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ListKind>,
    Extension(auth): Extension<AuthContext>,
    Path((list_id, bourbon_id)): Path<(String, String)>,
    action: MembershipAction,
) -> Result<Success<ListWithRefs>> {
    let list_id = parse_object_id(&list_id)?;
    let bourbon_id = parse_object_id(&bourbon_id)?;

    let (list, owner) = state
        .db
        .update_list_membership(kind, &list_id, &bourbon_id, &auth.user_id, action)
        .await?;

    Ok(Success(ListWithRefs::new(kind, list, owner)))
}
