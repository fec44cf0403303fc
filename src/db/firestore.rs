// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Bourbons (read-only catalog)
//! - Users (profiles, session tokens, back-references)
//! - Reviews
//! - API keys
//!
//! Collection and wishlist operations live in `db::lists`.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{ApiKey, Bourbon, User, UserReview, UserReviewRef};
use firestore::errors::{BackoffError, FirestoreError};
use firestore::{paths, FirestoreTransaction, FirestoreTransactionOptions};
use futures_util::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Upper bound on retries of one read-modify-write transaction.
const TRANSACTION_MAX_ELAPSED_SECS: i64 = 10;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // The emulator accepts any bearer token; hand it an unsigned one.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    pub(crate) fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Bourbon Operations ──────────────────────────────────────

    /// Get a catalog entry by ID.
    pub async fn get_bourbon(&self, bourbon_id: &str) -> Result<Option<Bourbon>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::BOURBONS)
            .obj()
            .one(bourbon_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch the whole catalog.
    ///
    /// Search and ordering are evaluated in memory (see `services::catalog`).
    pub async fn list_bourbons(&self) -> Result<Vec<Bourbon>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::BOURBONS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by document ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a user by (lower-cased) email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Get a user that must exist.
    pub(crate) async fn require_user(&self, user_id: &str) -> Result<User, AppError> {
        self.get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", user_id)))
    }

    /// Store a newly registered user. Never overwrites an existing document.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| match e {
                FirestoreError::DataConflictError(_) => {
                    AppError::Conflict(format!("user {} already exists", user.id))
                }
                other => AppError::Database(other.to_string()),
            })?;
        Ok(())
    }

    /// Record a session token for a user, first dropping stored tokens that
    /// `is_live` rejects. Returns the updated user.
    pub async fn add_session_token(
        &self,
        user_id: &str,
        token: &str,
        is_live: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Result<User, AppError> {
        let (user_id, token) = (user_id.to_string(), token.to_string());
        let is_live = Arc::new(is_live);

        self.run_transaction(move |db, transaction| {
            let (user_id, token, is_live) = (user_id.clone(), token.clone(), is_live.clone());
            async move {
                let mut user = db.require_user(&user_id).await?;
                user.add_token(token, |t| (*is_live)(t));
                user.updated_at = crate::time_utils::now_rfc3339();
                db.stage_session_tokens(&user, transaction)?;
                Ok::<_, AppError>(user)
            }
            .boxed()
        })
        .await
    }

    /// Remove a session token. Returns false if the user did not hold it.
    pub async fn revoke_session_token(&self, user_id: &str, token: &str) -> Result<bool, AppError> {
        let (user_id, token) = (user_id.to_string(), token.to_string());

        self.run_transaction(move |db, transaction| {
            let (user_id, token) = (user_id.clone(), token.clone());
            async move {
                let mut user = db.require_user(&user_id).await?;
                if !user.revoke_token(&token) {
                    return Ok(false);
                }
                user.updated_at = crate::time_utils::now_rfc3339();
                db.stage_session_tokens(&user, transaction)?;
                Ok::<_, AppError>(true)
            }
            .boxed()
        })
        .await
    }

    // ─── Review Operations ───────────────────────────────────────

    /// Get a review by ID.
    pub async fn get_review(&self, review_id: &str) -> Result<Option<UserReview>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::REVIEWS)
            .obj()
            .one(review_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All reviews whose `field` equals `value` (`bourbon_id` or `user.id`).
    async fn reviews_where(&self, field: &str, value: &str) -> Result<Vec<UserReview>, AppError> {
        let field = field.to_string();
        let value = value.to_string();
        let mut reviews: Vec<UserReview> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::REVIEWS)
            .filter(move |q| q.field(field.as_str()).eq(value.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Newest first; avoids needing a composite index for order_by
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    /// All reviews of a bourbon.
    pub async fn reviews_for_bourbon(&self, bourbon_id: &str) -> Result<Vec<UserReview>, AppError> {
        self.reviews_where("bourbon_id", bourbon_id).await
    }

    /// All reviews written by a user.
    pub async fn reviews_by_user(&self, user_id: &str) -> Result<Vec<UserReview>, AppError> {
        self.reviews_where("user.id", user_id).await
    }

    /// Store a new review and its back-reference on the author atomically.
    ///
    /// Returns the updated author. Fails with `Conflict` if the author has
    /// already reviewed this bourbon.
    pub async fn create_review(&self, review: &UserReview) -> Result<User, AppError> {
        let review = review.clone();
        let txn_review = review.clone();

        let author = self
            .run_transaction(move |db, transaction| {
                let review = txn_review.clone();
                async move {
                    let mut author = db.require_user(&review.user.id).await?;

                    let existing = db.reviews_by_user(&author.id).await?;
                    if existing.iter().any(|r| r.bourbon_id == review.bourbon_id) {
                        return Err(AppError::Conflict(
                            "user already reviewed this bourbon".to_string(),
                        ));
                    }

                    author.reviews.push(UserReviewRef {
                        review_id: review.id.clone(),
                        review_title: review.review_title.clone(),
                    });
                    author.updated_at = review.created_at.clone();

                    db.stage_update(collections::REVIEWS, &review.id, &review, transaction)?;
                    db.stage_user(&author, transaction)?;
                    Ok::<_, AppError>(author)
                }
                .boxed()
            })
            .await?;

        tracing::info!(
            user_id = %author.id,
            review_id = %review.id,
            bourbon_id = %review.bourbon_id,
            "Review created"
        );

        Ok(author)
    }

    // ─── API Key Operations ──────────────────────────────────────

    /// Get an API key document.
    pub async fn get_api_key(&self, key: &str) -> Result<Option<ApiKey>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::KEYS)
            .obj()
            .one(key)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store an API key document (used to refresh `last_access`).
    pub async fn set_api_key(&self, key: &ApiKey) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::KEYS)
            .document_id(&key.id)
            .object(key)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Transactions ────────────────────────────────────────────

    /// Run `op` as a read-modify-write transaction and commit its writes.
    ///
    /// Reads made through the handle passed to `op` join the transaction, so
    /// a concurrent change to any document it read makes Firestore run `op`
    /// again. Storage errors are retried; any other error aborts.
    pub(crate) async fn run_transaction<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        for<'b> F: Fn(FirestoreDb, &'b mut FirestoreTransaction) -> BoxFuture<'b, Result<T, AppError>>,
    {
        let options = FirestoreTransactionOptions::new().with_max_elapsed_time(
            chrono::Duration::seconds(TRANSACTION_MAX_ELAPSED_SECS),
        );

        self.get_client()?
            .run_transaction_with_options(
                |db, transaction| {
                    op(FirestoreDb { client: Some(db) }, transaction)
                        .map(|result| result.map_err(retry_policy))
                        .boxed()
                },
                options,
            )
            .await
            .map_err(transaction_error)
    }

    /// Stage a whole-document write in `transaction`.
    pub(crate) fn stage_update<T>(
        &self,
        collection: &str,
        document_id: &str,
        doc: &T,
        transaction: &mut FirestoreTransaction<'_>,
    ) -> Result<(), AppError>
    where
        T: Serialize + Sync + Send,
        for<'de> T: Deserialize<'de>,
    {
        self.get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(document_id)
            .object(doc)
            .add_to_transaction(transaction)
            .map_err(|e| staging_error(collection, e))?;
        Ok(())
    }

    /// Stage a document deletion in `transaction`.
    pub(crate) fn stage_delete(
        &self,
        collection: &str,
        document_id: &str,
        transaction: &mut FirestoreTransaction<'_>,
    ) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(document_id)
            .add_to_transaction(transaction)
            .map_err(|e| staging_error(collection, e))?;
        Ok(())
    }

    /// Stage the fields of `user` that change after registration.
    ///
    /// Profile fields (name, email, password) are left as stored.
    pub(crate) fn stage_user(
        &self,
        user: &User,
        transaction: &mut FirestoreTransaction<'_>,
    ) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .update()
            .fields(paths!(User::{collections, wishlists, reviews, tokens, updated_at}))
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .add_to_transaction(transaction)
            .map_err(|e| staging_error(collections::USERS, e))?;
        Ok(())
    }

    fn stage_session_tokens(
        &self,
        user: &User,
        transaction: &mut FirestoreTransaction<'_>,
    ) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .update()
            .fields(paths!(User::{tokens, updated_at}))
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .add_to_transaction(transaction)
            .map_err(|e| staging_error(collections::USERS, e))?;
        Ok(())
    }
}

/// Storage errors (including lock contention on transactional reads) are
/// worth another attempt; domain errors end the transaction.
fn retry_policy(err: AppError) -> BackoffError<AppError> {
    match err {
        AppError::Database(_) => BackoffError::transient(err),
        other => BackoffError::permanent(other),
    }
}

/// Recover the error a transaction body aborted with.
fn transaction_error(err: FirestoreError) -> AppError {
    match err {
        FirestoreError::ErrorInTransaction(failed) => match failed.source.downcast::<AppError>() {
            Ok(app_error) => *app_error,
            Err(source) => AppError::Database(format!("Transaction failed: {}", source)),
        },
        other => AppError::Database(format!("Transaction failed: {}", other)),
    }
}

fn staging_error(collection: &str, err: FirestoreError) -> AppError {
    AppError::Internal(anyhow::anyhow!(
        "Failed to add {} write to transaction: {}",
        collection,
        err
    ))
}
