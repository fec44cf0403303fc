// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API keys for third-party catalog access.

use serde::{Deserialize, Serialize};

/// Key document stored in the `keys` collection. The document ID is the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    #[serde(rename = "_id")]
    pub id: String,
    pub app_name: String,
    pub active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_access: String,
}
