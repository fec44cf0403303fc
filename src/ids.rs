// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document identifiers.
//!
//! IDs are 12 bytes rendered as 24 lowercase hex characters: a big-endian
//! Unix timestamp (seconds) followed by 8 random bytes, i.e. the MongoDB
//! ObjectId layout, so catalog exports keep their bourbon IDs.

use ring::rand::{SecureRandom, SystemRandom};
use std::time::{SystemTime, UNIX_EPOCH};

/// Length of an ID in hex characters.
pub const OBJECT_ID_LEN: usize = 24;

/// Generate a new document ID.
pub fn new_object_id() -> anyhow::Result<String> {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as u32;

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    SystemRandom::new()
        .fill(&mut bytes[4..])
        .map_err(|_| anyhow::anyhow!("system random source unavailable"))?;

    Ok(hex::encode(bytes))
}

/// Whether `s` is a well-formed document ID.
pub fn is_object_id(s: &str) -> bool {
    s.len() == OBJECT_ID_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Validate a path parameter as an ID, returning it lower-cased.
pub fn parse_object_id(s: &str) -> crate::error::Result<String> {
    let lowered = s.to_ascii_lowercase();
    if is_object_id(&lowered) {
        Ok(lowered)
    } else {
        Err(crate::error::AppError::BadRequest(format!(
            "invalid id: {}",
            s
        )))
    }
}

/// Uniform random index in `0..len` (len must be non-zero).
pub fn random_index(len: usize) -> anyhow::Result<usize> {
    let mut buf = [0u8; 8];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| anyhow::anyhow!("system random source unavailable"))?;
    // Modulo bias is negligible for catalog-sized ranges.
    Ok((u64::from_le_bytes(buf) % len as u64) as usize)
}
