// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collections and wishlists.
//!
//! Both kinds share one document shape and live in separate Firestore
//! collections. The owning user keeps a back-reference per list
//! (`UserCollectionRef` / `UserWishlistRef`) holding only bourbon IDs.

use crate::models::bourbon::Bourbon;
use crate::models::user::{BourbonsRef, UserRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which list family a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Collection,
    Wishlist,
}

impl ListKind {
    pub const ALL: [ListKind; 2] = [ListKind::Collection, ListKind::Wishlist];

    /// Path segment and display name (`collection` / `wishlist`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Collection => "collection",
            ListKind::Wishlist => "wishlist",
        }
    }

    /// Firestore collection holding documents of this kind.
    pub fn db_collection(&self) -> &'static str {
        match self {
            ListKind::Collection => crate::db::collections::COLLECTIONS,
            ListKind::Wishlist => crate::db::collections::WISHLISTS,
        }
    }

    /// Name used when a create/update request leaves it blank.
    pub fn default_name(&self) -> &'static str {
        match self {
            ListKind::Collection => "My Collection",
            ListKind::Wishlist => "My Wishlist",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collection" => Ok(ListKind::Collection),
            "wishlist" => Ok(ListKind::Wishlist),
            _ => Err(()),
        }
    }
}

/// Add or remove a bourbon from a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAction {
    Add,
    Delete,
}

impl MembershipAction {
    /// Whether applying this action to a list with the given membership
    /// state makes sense: adds need the bourbon absent, deletes need it
    /// present.
    pub fn is_valid(&self, bourbons: &[Bourbon], bourbon_id: &str) -> bool {
        let present = bourbons.iter().any(|b| b.id == bourbon_id);
        match self {
            MembershipAction::Add => !present,
            MembershipAction::Delete => present,
        }
    }
}

/// A collection or wishlist document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Collection {
    #[serde(rename = "_id")]
    pub id: String,
    /// Owner
    pub user: UserRef,
    pub name: String,
    #[serde(default)]
    pub private: bool,
    /// Full copies of member bourbons, in insertion order
    #[serde(default)]
    pub bourbons: Vec<Bourbon>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Collection {
    pub fn new(id: String, owner: UserRef, name: String, private: bool, now: &str) -> Self {
        Self {
            id,
            user: owner,
            name,
            private,
            bourbons: Vec::new(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user.id == user_id
    }

    /// Private lists are only visible to their owner.
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        !self.private || self.is_owned_by(user_id)
    }

    /// Apply a membership change. Returns false (and leaves the list
    /// untouched) when the action is not valid for the current contents.
    pub fn apply(&mut self, action: MembershipAction, bourbon: &Bourbon) -> bool {
        if !action.is_valid(&self.bourbons, &bourbon.id) {
            return false;
        }
        match action {
            MembershipAction::Add => self.bourbons.push(bourbon.clone()),
            MembershipAction::Delete => self.bourbons.retain(|b| b.id != bourbon.id),
        }
        true
    }
}

/// Back-reference to a collection, stored on the owning user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserCollectionRef {
    pub collection_id: String,
    pub collection_name: String,
    #[serde(default)]
    pub bourbons: Vec<BourbonsRef>,
}

/// Back-reference to a wishlist, stored on the owning user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserWishlistRef {
    pub wishlist_id: String,
    pub wishlist_name: String,
    #[serde(default)]
    pub bourbons: Vec<BourbonsRef>,
}

/// Operations shared by both back-reference types.
pub trait ListRef {
    fn new(list_id: &str, name: &str) -> Self;
    fn list_id(&self) -> &str;
    fn set_name(&mut self, name: &str);
    fn bourbons_mut(&mut self) -> &mut Vec<BourbonsRef>;
}

impl ListRef for UserCollectionRef {
    fn new(list_id: &str, name: &str) -> Self {
        Self {
            collection_id: list_id.to_string(),
            collection_name: name.to_string(),
            bourbons: Vec::new(),
        }
    }

    fn list_id(&self) -> &str {
        &self.collection_id
    }

    fn set_name(&mut self, name: &str) {
        self.collection_name = name.to_string();
    }

    fn bourbons_mut(&mut self) -> &mut Vec<BourbonsRef> {
        &mut self.bourbons
    }
}

impl ListRef for UserWishlistRef {
    fn new(list_id: &str, name: &str) -> Self {
        Self {
            wishlist_id: list_id.to_string(),
            wishlist_name: name.to_string(),
            bourbons: Vec::new(),
        }
    }

    fn list_id(&self) -> &str {
        &self.wishlist_id
    }

    fn set_name(&mut self, name: &str) {
        self.wishlist_name = name.to_string();
    }

    fn bourbons_mut(&mut self) -> &mut Vec<BourbonsRef> {
        &mut self.bourbons
    }
}

/// Push or pull a bourbon pointer on the matching back-reference.
/// Returns false when no back-reference matches `list_id`.
pub(crate) fn apply_to_ref<R: ListRef>(
    refs: &mut [R],
    list_id: &str,
    action: MembershipAction,
    bourbon_id: &str,
) -> bool {
    let Some(list_ref) = refs.iter_mut().find(|r| r.list_id() == list_id) else {
        return false;
    };
    let bourbons = list_ref.bourbons_mut();
    match action {
        MembershipAction::Add => {
            if !bourbons.iter().any(|b| b.bourbon_id == bourbon_id) {
                bourbons.push(BourbonsRef {
                    bourbon_id: bourbon_id.to_string(),
                });
            }
        }
        MembershipAction::Delete => bourbons.retain(|b| b.bourbon_id != bourbon_id),
    }
    true
}

pub(crate) fn rename_ref<R: ListRef>(refs: &mut [R], list_id: &str, name: &str) -> bool {
    match refs.iter_mut().find(|r| r.list_id() == list_id) {
        Some(r) => {
            r.set_name(name);
            true
        }
        None => false,
    }
}

pub(crate) fn remove_ref<R: ListRef>(refs: &mut Vec<R>, list_id: &str) -> bool {
    let before = refs.len();
    refs.retain(|r| r.list_id() != list_id);
    refs.len() != before
}
