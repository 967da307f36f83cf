// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Entity identifier generation.
//!
//! Ids are short and content-derived: `{prefix}-{hash}` where hash is the
//! first 8 hex chars of SHA256(seed + timestamp). Prefixes identify the
//! entity kind: `note`, `rec` (activity record), `bkt` (labeled bucket).

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Id prefix for notes.
pub const NOTE_PREFIX: &str = "note";
/// Id prefix for activity records.
pub const RECORD_PREFIX: &str = "rec";
/// Id prefix for labeled buckets.
pub const BUCKET_PREFIX: &str = "bkt";

/// Generate an entity ID from prefix, seed text, and timestamp.
/// Format: {prefix}-{hash} where hash is first 8 hex chars of SHA256(seed + timestamp)
pub fn generate_id(prefix: &str, seed: &str, created_at: &DateTime<Utc>) -> String {
    let input = format!("{}{}", seed, created_at.to_rfc3339());
    let hash = Sha256::digest(input.as_bytes());
    let short_hash = hex::encode(&hash[..4]); // First 8 hex chars (4 bytes)
    format!("{}-{}", prefix, short_hash)
}

/// Generate a unique ID, handling collisions by appending incrementing suffix.
pub fn generate_unique_id<F>(
    prefix: &str,
    seed: &str,
    created_at: &DateTime<Utc>,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let base_id = generate_id(prefix, seed, created_at);

    if !exists(&base_id) {
        return base_id;
    }

    // Handle collision with incrementing suffix
    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
