// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection and wishlist operations.
//!
//! Every change touches two documents: the list itself and the owner's
//! back-reference on the user document. Each change reads both inside one
//! read-modify-write transaction, so concurrent changes to the same user
//! are serialized instead of overwriting each other.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{Bourbon, Collection, ListKind, MembershipAction, User};
use crate::time_utils::now_rfc3339;
use futures_util::FutureExt;

impl FirestoreDb {
    /// Get a collection or wishlist by ID.
    pub async fn get_list(
        &self,
        kind: ListKind,
        list_id: &str,
    ) -> Result<Option<Collection>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(kind.db_collection())
            .obj()
            .one(list_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All lists of a kind owned by a user, oldest first.
    pub async fn get_lists_for_user(
        &self,
        kind: ListKind,
        user_id: &str,
    ) -> Result<Vec<Collection>, AppError> {
        let user_id = user_id.to_string();
        let mut lists: Vec<Collection> = self
            .get_client()?
            .fluent()
            .select()
            .from(kind.db_collection())
            .filter(move |q| q.field("user.id").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        lists.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(lists)
    }

    /// Create a list owned by `user_id` and add its back-reference.
    pub async fn create_list(
        &self,
        kind: ListKind,
        user_id: &str,
        name: &str,
        private: bool,
    ) -> Result<(Collection, User), AppError> {
        let list_id = crate::ids::new_object_id()?;
        let (user_id, name) = (user_id.to_string(), name.to_string());

        let (list, owner) = self
            .run_transaction(move |db, transaction| {
                let (list_id, user_id, name) = (list_id.clone(), user_id.clone(), name.clone());
                async move {
                    let mut owner = db.require_user(&user_id).await?;

                    let now = now_rfc3339();
                    let list = Collection::new(list_id, owner.user_ref(), name, private, &now);
                    owner.add_list_ref(kind, &list.id, &list.name);
                    owner.updated_at = now;

                    db.stage_update(kind.db_collection(), &list.id, &list, transaction)?;
                    db.stage_user(&owner, transaction)?;
                    Ok::<_, AppError>((list, owner))
                }
                .boxed()
            })
            .await?;

        tracing::info!(
            kind = %kind,
            list_id = %list.id,
            user_id = %owner.id,
            "List created"
        );

        Ok((list, owner))
    }

    /// Rename a list and set its privacy flag. Only the owner may do this.
    pub async fn update_list(
        &self,
        kind: ListKind,
        list_id: &str,
        user_id: &str,
        name: &str,
        private: bool,
    ) -> Result<(Collection, User), AppError> {
        let ids = (list_id.to_string(), user_id.to_string());
        let name = name.to_string();

        let result = self
            .run_transaction(move |db, transaction| {
                let ((list_id, user_id), name) = (ids.clone(), name.clone());
                async move {
                    let (mut list, mut owner) =
                        db.load_owned_list(kind, &list_id, &user_id).await?;

                    let now = now_rfc3339();
                    list.name = name;
                    list.private = private;
                    list.updated_at = now.clone();

                    if !owner.rename_list_ref(kind, &list_id, &list.name) {
                        tracing::warn!(
                            kind = %kind,
                            list_id = %list_id,
                            user_id = %user_id,
                            "Back-reference missing on update, recreating"
                        );
                        restore_list_ref(&mut owner, kind, &list);
                    }
                    owner.updated_at = now;

                    db.stage_update(kind.db_collection(), &list.id, &list, transaction)?;
                    db.stage_user(&owner, transaction)?;
                    Ok::<_, AppError>((list, owner))
                }
                .boxed()
            })
            .await?;

        tracing::info!(kind = %kind, list_id, user_id, "List updated");
        Ok(result)
    }

    /// Delete a list and its back-reference. Returns the updated owner.
    ///
    /// Fails with `BadRequest` if the caller owns no such list.
    pub async fn delete_list(
        &self,
        kind: ListKind,
        list_id: &str,
        user_id: &str,
    ) -> Result<User, AppError> {
        let ids = (list_id.to_string(), user_id.to_string());

        let owner = self
            .run_transaction(move |db, transaction| {
                let (list_id, user_id) = ids.clone();
                async move {
                    let (_, mut owner) = db
                        .load_owned_list(kind, &list_id, &user_id)
                        .await
                        .map_err(|e| match e {
                            AppError::NotFound(_) => {
                                AppError::BadRequest("bad request".to_string())
                            }
                            other => other,
                        })?;

                    owner.remove_list_ref(kind, &list_id);
                    owner.updated_at = now_rfc3339();

                    db.stage_delete(kind.db_collection(), &list_id, transaction)?;
                    db.stage_user(&owner, transaction)?;
                    Ok::<_, AppError>(owner)
                }
                .boxed()
            })
            .await?;

        tracing::info!(kind = %kind, list_id, user_id, "List deleted");
        Ok(owner)
    }

    /// Add or remove a bourbon in a list, keeping the owner's back-reference
    /// in sync.
    ///
    /// Checks, in order: the bourbon exists, the list exists and belongs to
    /// the caller, and the action fits the current membership.
    pub async fn update_list_membership(
        &self,
        kind: ListKind,
        list_id: &str,
        bourbon_id: &str,
        user_id: &str,
        action: MembershipAction,
    ) -> Result<(Collection, User), AppError> {
        let bourbon: Bourbon = self
            .get_bourbon(bourbon_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("bourbon {} not found", bourbon_id)))?;

        let ids = (list_id.to_string(), user_id.to_string());

        let result = self
            .run_transaction(move |db, transaction| {
                let ((list_id, user_id), bourbon) = (ids.clone(), bourbon.clone());
                async move {
                    let (mut list, mut owner) =
                        db.load_owned_list(kind, &list_id, &user_id).await?;

                    if !list.apply(action, &bourbon) {
                        return Err(AppError::BadRequest("action not valid".to_string()));
                    }

                    let now = now_rfc3339();
                    list.updated_at = now.clone();

                    if !owner.apply_list_membership(kind, &list_id, action, &bourbon.id) {
                        tracing::warn!(
                            kind = %kind,
                            list_id = %list_id,
                            user_id = %user_id,
                            "Back-reference missing on membership change, recreating"
                        );
                        restore_list_ref(&mut owner, kind, &list);
                    }
                    owner.updated_at = now;

                    db.stage_update(kind.db_collection(), &list.id, &list, transaction)?;
                    db.stage_user(&owner, transaction)?;
                    Ok::<_, AppError>((list, owner))
                }
                .boxed()
            })
            .await?;

        tracing::info!(
            kind = %kind,
            list_id,
            bourbon_id,
            user_id,
            action = ?action,
            "List membership updated"
        );

        Ok(result)
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Load a list that must belong to `user_id`, plus the owner document.
    ///
    /// Lists owned by someone else are reported as not found.
    async fn load_owned_list(
        &self,
        kind: ListKind,
        list_id: &str,
        user_id: &str,
    ) -> Result<(Collection, User), AppError> {
        let not_found = || AppError::NotFound(format!("{} {} not found", kind, list_id));

        let list = self
            .get_list(kind, list_id)
            .await?
            .filter(|l| l.is_owned_by(user_id))
            .ok_or_else(not_found)?;

        let owner = self.require_user(user_id).await?;

        Ok((list, owner))
    }
}

/// Recreate a missing back-reference from the list itself.
fn restore_list_ref(owner: &mut User, kind: ListKind, list: &Collection) {
    owner.add_list_ref(kind, &list.id, &list.name);
    for bourbon in &list.bourbons {
        owner.apply_list_membership(kind, &list.id, MembershipAction::Add, &bourbon.id);
    }
}
