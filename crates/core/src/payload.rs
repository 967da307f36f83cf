// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! RawPayload codec.
//!
//! The persisted document is one versioned JSON object:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "notes": [ { "id", "description", "time_estimation", "label", "recurring" } ],
//!   "activity_records": [ { "id", "note_id", "started_at", "completed_at", "time_to_complete" } ],
//!   "labeled_buckets": [ { "id", "title", "created_at" } ]
//! }
//! ```
//!
//! All three collection arrays are required. Timestamps are RFC 3339
//! strings. [`decode`] expects a payload already upgraded by the migration
//! pipeline.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::migrate::CURRENT_VERSION;
use crate::note::{ActivityRecord, LabeledBucket, Note};

/// The top-level arrays every payload must carry.
pub const REQUIRED_COLLECTIONS: [&str; 3] = ["notes", "activity_records", "labeled_buckets"];

/// The three canonical collections in client shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub notes: Vec<Note>,
    pub activity_records: Vec<ActivityRecord>,
    pub labeled_buckets: Vec<LabeledBucket>,
}

/// Checks the payload carries all required collection arrays.
pub fn validate(payload: &Value) -> Result<()> {
    let document = payload
        .as_object()
        .ok_or_else(|| Error::Validation("payload must be a JSON object".to_string()))?;

    for collection in REQUIRED_COLLECTIONS {
        match document.get(collection) {
            Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(Error::Validation(format!("'{collection}' must be an array")));
            }
            None => {
                return Err(Error::Validation(format!("missing '{collection}' array")));
            }
        }
    }
    Ok(())
}

fn records<'a>(payload: &'a Value, collection: &str) -> &'a [Value] {
    payload.get(collection).and_then(Value::as_array).map_or(&[], Vec::as_slice)
}

/// Maps a validated, current-version payload into the client collections.
pub fn decode(payload: &Value) -> Result<Collections> {
    validate(payload)?;

    let notes = records(payload, "notes")
        .iter()
        .map(Note::from_persisted)
        .collect::<Result<Vec<_>>>()?;
    let activity_records = records(payload, "activity_records")
        .iter()
        .map(ActivityRecord::from_persisted)
        .collect::<Result<Vec<_>>>()?;
    let labeled_buckets = records(payload, "labeled_buckets")
        .iter()
        .map(LabeledBucket::from_persisted)
        .collect::<Result<Vec<_>>>()?;

    Ok(Collections { notes, activity_records, labeled_buckets })
}

/// Renders the client collections as a current-version payload.
pub fn encode(
    notes: &[Note],
    activity_records: &[ActivityRecord],
    labeled_buckets: &[LabeledBucket],
) -> Result<Value> {
    let mut payload = Map::new();
    payload.insert("version".to_string(), Value::String(CURRENT_VERSION.to_string()));
    payload.insert(
        "notes".to_string(),
        Value::Array(notes.iter().map(Note::to_persisted).collect::<Result<_>>()?),
    );
    payload.insert(
        "activity_records".to_string(),
        Value::Array(
            activity_records.iter().map(ActivityRecord::to_persisted).collect::<Result<_>>()?,
        ),
    );
    payload.insert(
        "labeled_buckets".to_string(),
        Value::Array(
            labeled_buckets.iter().map(LabeledBucket::to_persisted).collect::<Result<_>>()?,
        ),
    );
    Ok(Value::Object(payload))
}

/// File name for a backup export, e.g. `bucketlist-backup-2026-08-07.json`.
pub fn backup_file_name(now: DateTime<Utc>) -> String {
    format!("bucketlist-backup-{}.json", now.format("%Y-%m-%d"))
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
