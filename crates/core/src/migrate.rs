// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned payload migration.
//!
//! Persisted payloads carry a `version` tag. The pipeline is an ordered
//! table of version->transform entries; [`migrate`] locates the payload's
//! version and applies every transform from there through the newest, each
//! receiving the previous transform's output. The entry for the current
//! version is the identity, which makes migration idempotent. Payloads with
//! a version the table does not know are unresolvable and rejected; the
//! pipeline never downgrades.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::payload::REQUIRED_COLLECTIONS;

/// The version written by this build.
pub const CURRENT_VERSION: &str = "1.0";

/// Version assigned to payloads with no `version` field (the legacy
/// JavaScript app never stamped one).
pub const OLDEST_VERSION: &str = "0.0";

type Transform = fn(Value) -> Result<Value>;

/// Migration table, ascending by version tag.
const MIGRATIONS: &[(&str, Transform)] = &[
    (OLDEST_VERSION, migrate_0_0_to_1_0),
    (CURRENT_VERSION, identity),
];

/// Upgrades a payload to [`CURRENT_VERSION`].
///
/// Fails with [`Error::UnknownVersion`] when the payload's version is not
/// in the migration table (newer than this build, or an unrecognized tag).
pub fn migrate(payload: Value) -> Result<Value> {
    let version = payload
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(OLDEST_VERSION)
        .to_string();

    let start = MIGRATIONS
        .iter()
        .position(|(tag, _)| *tag == version)
        .ok_or_else(|| Error::UnknownVersion {
            found: version.clone(),
            newest: CURRENT_VERSION.to_string(),
        })?;

    let mut migrated = payload;
    for (tag, transform) in &MIGRATIONS[start..] {
        migrated = transform(migrated)?;
        if *tag != version {
            tracing::debug!(from = version.as_str(), to = *tag, "applied payload migration");
        }
    }
    Ok(migrated)
}

fn identity(payload: Value) -> Result<Value> {
    Ok(payload)
}

/// `0.0 -> 1.0`: stamp the version, materialize missing collection arrays,
/// and normalize legacy records: the JavaScript app generated numeric
/// `Date.now()` ids and allowed fractional time estimates.
fn migrate_0_0_to_1_0(payload: Value) -> Result<Value> {
    let mut old = match payload {
        Value::Object(map) => map,
        other => {
            return Err(Error::Validation(format!("payload must be a JSON object, got {other}")))
        }
    };

    let mut migrated = Map::new();
    migrated.insert("version".to_string(), Value::String(CURRENT_VERSION.to_string()));

    for collection in REQUIRED_COLLECTIONS {
        let mut records = match old.remove(collection) {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        };
        for record in records.iter_mut().filter_map(Value::as_object_mut) {
            stringify_id(record, "id");
            stringify_id(record, "note_id");
            round_time_estimation(record);
        }
        migrated.insert(collection.to_string(), Value::Array(records));
    }

    Ok(Value::Object(migrated))
}

/// Rewrites a numeric id as its decimal string.
fn stringify_id(record: &mut Map<String, Value>, key: &str) {
    if let Some(Value::Number(id)) = record.get(key) {
        let id = id.to_string();
        record.insert(key.to_string(), Value::String(id));
    }
}

/// Rounds a fractional `time_estimation` to whole minutes.
fn round_time_estimation(record: &mut Map<String, Value>) {
    if let Some(Value::Number(estimate)) = record.get("time_estimation") {
        if estimate.as_u64().is_none() {
            let rounded = estimate.as_f64().map_or(0, |f| f.round().max(0.0) as u64);
            record.insert("time_estimation".to_string(), Value::from(rounded));
        }
    }
}

#[cfg(test)]
#[path = "migrate_tests.rs"]
mod tests;
