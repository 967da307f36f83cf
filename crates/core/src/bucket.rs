// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bucket projection engine.
//!
//! Buckets are never stored: [`project`] re-derives every [`BucketModel`]
//! from the flat note/record collections on each read. Stats come from the
//! membership partitions, so they cannot drift from the underlying data.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::note::{ActivityRecord, LabeledBucket, Note};

/// A time-estimate range backing one time bucket.
///
/// Bounds are inclusive minutes; `max` of `None` means unbounded (the last
/// range of the table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: u32,
    pub max: Option<u32>,
    pub title: String,
}

impl TimeRange {
    /// Returns true if the estimate falls within this range.
    pub fn contains(&self, minutes: u32) -> bool {
        self.min <= minutes && self.max.map_or(true, |max| minutes <= max)
    }
}

/// The built-in time-bucket table: contiguous over whole minutes, ascending,
/// last range unbounded.
pub fn default_time_buckets() -> Vec<TimeRange> {
    vec![
        TimeRange { min: 0, max: Some(15), title: "Up to 15 mins".to_string() },
        TimeRange { min: 16, max: Some(30), title: "Up to 30 mins".to_string() },
        TimeRange { min: 31, max: Some(60), title: "Up to 1 hour".to_string() },
        TimeRange { min: 61, max: Some(120), title: "Up to 2 hours".to_string() },
        TimeRange { min: 121, max: None, title: "Over 2 hours".to_string() },
    ]
}

/// What a bucket is derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BucketKind {
    /// A range of the time-estimate table.
    Time(TimeRange),
    /// A user-defined labeled bucket.
    Labeled(LabeledBucket),
}

/// Membership counts derived from the bucket partitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    /// Notes with no open activity record.
    pub pending: usize,
    /// Notes with an open activity record.
    pub in_progress: usize,
    /// Completed activity records for the bucket's notes.
    pub completed: usize,
}

/// The ephemeral, derived view-model of one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketModel {
    pub kind: BucketKind,
    /// Every note currently belonging to the bucket.
    pub notes: Vec<Note>,
    /// Every activity record referencing a member note.
    pub activity_records: Vec<ActivityRecord>,
    /// Member notes with no open record.
    pub pending: Vec<Note>,
    /// Member notes with an open record.
    pub in_progress: Vec<Note>,
    pub stats: BucketStats,
}

impl BucketModel {
    fn build(kind: BucketKind, notes: Vec<Note>, all_records: &[ActivityRecord]) -> Self {
        let activity_records: Vec<ActivityRecord> = all_records
            .iter()
            .filter(|record| notes.iter().any(|note| note.id == record.note_id))
            .cloned()
            .collect();

        let open_note_ids: HashSet<&str> = activity_records
            .iter()
            .filter(|record| record.is_open())
            .map(|record| record.note_id.as_str())
            .collect();

        let (in_progress, pending): (Vec<Note>, Vec<Note>) = notes
            .iter()
            .cloned()
            .partition(|note| open_note_ids.contains(note.id.as_str()));

        let completed = activity_records.iter().filter(|record| !record.is_open()).count();

        let stats = BucketStats {
            pending: pending.len(),
            in_progress: in_progress.len(),
            completed,
        };

        BucketModel { kind, notes, activity_records, pending, in_progress, stats }
    }

    /// Display title of the bucket.
    pub fn title(&self) -> &str {
        match &self.kind {
            BucketKind::Time(range) => &range.title,
            BucketKind::Labeled(bucket) => &bucket.title,
        }
    }

    /// Returns true for a user-defined labeled bucket.
    pub fn is_labeled(&self) -> bool {
        matches!(self.kind, BucketKind::Labeled(_))
    }
}

/// Projects the flat collections into bucket view-models.
///
/// Time buckets come first in table order, then labeled buckets in stored
/// order. A labeled note never enters a time bucket, whatever its estimate;
/// an unlabeled note lands in the one range containing its estimate.
pub fn project(
    notes: &[Note],
    records: &[ActivityRecord],
    labeled: &[LabeledBucket],
    ranges: &[TimeRange],
) -> Vec<BucketModel> {
    let mut buckets = Vec::with_capacity(ranges.len() + labeled.len());

    for range in ranges {
        let members: Vec<Note> = notes
            .iter()
            .filter(|note| !note.is_labeled() && range.contains(note.time_estimation))
            .cloned()
            .collect();
        buckets.push(BucketModel::build(BucketKind::Time(range.clone()), members, records));
    }

    for bucket in labeled {
        let members: Vec<Note> =
            notes.iter().filter(|note| note.label == bucket.title).cloned().collect();
        buckets.push(BucketModel::build(BucketKind::Labeled(bucket.clone()), members, records));
    }

    buckets
}

#[cfg(test)]
#[path = "bucket_tests.rs"]
mod tests;
