// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core entity types for the bucketlist organizer.
//!
//! This module contains the fundamental data types: Note, ActivityRecord,
//! and LabeledBucket, together with their persisted-to-client schema tables.
//!
//! Entities are immutable value objects: every update returns a new
//! instance and the store replaces the old one in its collection. A note
//! has no stored status; it is pending or in progress depending on
//! whether an open activity record references it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{Error, Result};
use crate::schema::{self, DefaultValue, FieldSpec, Schema};

/// Smallest `time_to_complete` ever recorded, in minutes.
pub const MIN_TIME_TO_COMPLETE: f64 = 0.1;

/// Derived workflow status of a note.
///
/// Never stored: a note is in progress exactly while an open activity
/// record references it, so there is no second source of truth to drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStatus {
    /// No open activity record.
    Pending,
    /// An open activity record references the note.
    InProgress,
}

impl NoteStatus {
    /// Returns the string representation used in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Pending => "pending",
            NoteStatus::InProgress => "in_progress",
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of work awaiting or undergoing attention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier, stable for the entity lifetime.
    pub id: String,
    /// Free text describing the work.
    pub description: String,
    /// Estimated minutes; places the note into a time bucket when unlabeled.
    pub time_estimation: u32,
    /// When non-empty, the note belongs to the labeled bucket with this title.
    #[serde(default)]
    pub label: String,
    /// Recurring notes survive completion and can be started again.
    #[serde(default)]
    pub recurring: bool,
}

/// Persisted-to-client mapping for [`Note`].
pub const NOTE_SCHEMA: Schema = &[
    FieldSpec { name: "id", persisted: "id", client: "id", default: DefaultValue::Null },
    FieldSpec {
        name: "description",
        persisted: "description",
        client: "description",
        default: DefaultValue::Text(""),
    },
    FieldSpec {
        name: "timeEstimation",
        persisted: "time_estimation",
        client: "timeEstimation",
        default: DefaultValue::Uint(0),
    },
    FieldSpec { name: "label", persisted: "label", client: "label", default: DefaultValue::Text("") },
    FieldSpec {
        name: "recurring",
        persisted: "recurring",
        client: "recurring",
        default: DefaultValue::False,
    },
];

/// User-provided fields for creating a note.
///
/// The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub description: String,
    pub time_estimation: u32,
    pub label: String,
    pub recurring: bool,
}

impl Note {
    /// Creates a new note from a draft.
    pub fn new(id: String, draft: NoteDraft) -> Self {
        Note {
            id,
            description: draft.description,
            time_estimation: draft.time_estimation,
            label: draft.label,
            recurring: draft.recurring,
        }
    }

    /// Returns true if the note belongs to a labeled bucket.
    pub fn is_labeled(&self) -> bool {
        !self.label.is_empty()
    }

    /// Builds a note from its persisted record shape.
    pub fn from_persisted(record: &Value) -> Result<Self> {
        let client = schema::to_client(NOTE_SCHEMA, record)?;
        Ok(serde_json::from_value(Value::Object(client))?)
    }

    /// Renders the note in its persisted record shape.
    pub fn to_persisted(&self) -> Result<Value> {
        let client = serde_json::to_value(self)?;
        Ok(Value::Object(schema::to_persisted(NOTE_SCHEMA, &client)?))
    }
}

/// One timed attempt at working on a note.
///
/// A record with no `completed_at` is open: its note is in progress.
/// Completion sets `completed_at` and `time_to_complete` exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Unique identifier.
    pub id: String,
    /// The note this record belongs to (lookup only, no ownership).
    pub note_id: String,
    /// When work started.
    pub started_at: DateTime<Utc>,
    /// When work finished; absent while the record is open.
    pub completed_at: Option<DateTime<Utc>>,
    /// Minutes from start to completion, rounded to one decimal; absent while open.
    pub time_to_complete: Option<f64>,
}

/// Persisted-to-client mapping for [`ActivityRecord`].
pub const RECORD_SCHEMA: Schema = &[
    FieldSpec { name: "id", persisted: "id", client: "id", default: DefaultValue::Null },
    FieldSpec {
        name: "noteId",
        persisted: "note_id",
        client: "noteId",
        default: DefaultValue::Null,
    },
    FieldSpec {
        name: "startedAt",
        persisted: "started_at",
        client: "startedAt",
        default: DefaultValue::Null,
    },
    FieldSpec {
        name: "completedAt",
        persisted: "completed_at",
        client: "completedAt",
        default: DefaultValue::Null,
    },
    FieldSpec {
        name: "timeToComplete",
        persisted: "time_to_complete",
        client: "timeToComplete",
        default: DefaultValue::Null,
    },
];

/// Rounds a minute count to one decimal place, clamped to the minimum.
fn round_minutes(minutes: f64) -> f64 {
    ((minutes * 10.0).round() / 10.0).max(MIN_TIME_TO_COMPLETE)
}

impl ActivityRecord {
    /// Creates an open record for a note, started now.
    ///
    /// The store generates the id (it owns the collision check).
    pub fn create_from_note(note: &Note, id: String, now: DateTime<Utc>) -> Self {
        ActivityRecord {
            id,
            note_id: note.id.clone(),
            started_at: now,
            completed_at: None,
            time_to_complete: None,
        }
    }

    /// Returns true while the record has not been completed.
    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }

    /// Completes the record, computing `time_to_complete`.
    ///
    /// Fails with [`Error::InvalidState`] if the record is already completed.
    pub fn finish(&self, now: DateTime<Utc>) -> Result<Self> {
        if self.completed_at.is_some() {
            return Err(Error::InvalidState(format!(
                "activity record '{}' is already completed",
                self.id
            )));
        }
        let minutes = (now - self.started_at).num_milliseconds() as f64 / 60_000.0;
        Ok(ActivityRecord {
            completed_at: Some(now),
            time_to_complete: Some(round_minutes(minutes)),
            ..self.clone()
        })
    }

    /// Re-opens the record by resetting its start time.
    ///
    /// Fails with [`Error::InvalidState`] if the record is already completed.
    pub fn restart(&self, now: DateTime<Utc>) -> Result<Self> {
        if self.completed_at.is_some() {
            return Err(Error::InvalidState(format!(
                "activity record '{}' is already completed",
                self.id
            )));
        }
        Ok(ActivityRecord { started_at: now, ..self.clone() })
    }

    /// Builds a record from its persisted record shape.
    pub fn from_persisted(record: &Value) -> Result<Self> {
        let client = schema::to_client(RECORD_SCHEMA, record)?;
        Ok(serde_json::from_value(Value::Object(client))?)
    }

    /// Renders the record in its persisted record shape.
    pub fn to_persisted(&self) -> Result<Value> {
        let client = serde_json::to_value(self)?;
        Ok(Value::Object(schema::to_persisted(RECORD_SCHEMA, &client)?))
    }
}

/// A user-defined named grouping of notes.
///
/// Notes join by `label == title`. Renaming a bucket would orphan its
/// notes; there is no rename operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledBucket {
    /// Unique identifier.
    pub id: String,
    /// Join key against `Note::label`; unique among labeled buckets.
    pub title: String,
    /// When the bucket was created.
    pub created_at: DateTime<Utc>,
}

/// Persisted-to-client mapping for [`LabeledBucket`].
pub const LABELED_BUCKET_SCHEMA: Schema = &[
    FieldSpec { name: "id", persisted: "id", client: "id", default: DefaultValue::Null },
    FieldSpec { name: "title", persisted: "title", client: "title", default: DefaultValue::Text("") },
    FieldSpec {
        name: "createdAt",
        persisted: "created_at",
        client: "createdAt",
        default: DefaultValue::Null,
    },
];

impl LabeledBucket {
    /// Creates a new labeled bucket.
    pub fn new(id: String, title: String, created_at: DateTime<Utc>) -> Self {
        LabeledBucket { id, title, created_at }
    }

    /// Builds a bucket from its persisted record shape.
    pub fn from_persisted(record: &Value) -> Result<Self> {
        let client = schema::to_client(LABELED_BUCKET_SCHEMA, record)?;
        Ok(serde_json::from_value(Value::Object(client))?)
    }

    /// Renders the bucket in its persisted record shape.
    pub fn to_persisted(&self) -> Result<Value> {
        let client = serde_json::to_value(self)?;
        Ok(Value::Object(schema::to_persisted(LABELED_BUCKET_SCHEMA, &client)?))
    }
}

#[cfg(test)]
#[path = "note_tests.rs"]
mod tests;
