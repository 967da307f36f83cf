// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::{DateTime, Utc};
use yare::parameterized;

fn ts(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap().to_utc()
}

fn note(id: &str, estimation: u32, label: &str) -> Note {
    Note {
        id: id.to_string(),
        description: format!("{id} description"),
        time_estimation: estimation,
        label: label.to_string(),
        recurring: false,
    }
}

fn open_record(id: &str, note_id: &str) -> ActivityRecord {
    ActivityRecord {
        id: id.to_string(),
        note_id: note_id.to_string(),
        started_at: ts("2026-01-15T12:00:00Z"),
        completed_at: None,
        time_to_complete: None,
    }
}

fn completed_record(id: &str, note_id: &str) -> ActivityRecord {
    ActivityRecord {
        completed_at: Some(ts("2026-01-15T12:10:00Z")),
        time_to_complete: Some(10.0),
        ..open_record(id, note_id)
    }
}

fn labeled(id: &str, title: &str) -> LabeledBucket {
    LabeledBucket::new(id.to_string(), title.to_string(), ts("2026-01-15T12:00:00Z"))
}

#[parameterized(
    zero = { 0, 0, Some(15), true },
    lower_bound = { 16, 16, Some(30), true },
    upper_bound = { 30, 16, Some(30), true },
    below = { 15, 16, Some(30), false },
    above = { 31, 16, Some(30), false },
    unbounded = { 100_000, 121, None, true },
    under_unbounded = { 120, 121, None, false },
)]
fn time_range_contains(estimation: u32, min: u32, max: Option<u32>, expected: bool) {
    let range = TimeRange { min, max, title: "range".to_string() };
    assert_eq!(range.contains(estimation), expected);
}

#[test]
fn default_table_is_ascending_with_unbounded_tail() {
    let table = default_time_buckets();
    assert_eq!(table.len(), 5);
    for pair in table.windows(2) {
        assert!(pair[0].min < pair[1].min);
        assert!(pair[0].max.is_some());
    }
    assert_eq!(table.last().unwrap().max, None);
}

#[parameterized(
    quick = { 10, "Up to 15 mins" },
    moderate = { 20, "Up to 30 mins" },
    hour = { 45, "Up to 1 hour" },
    long = { 90, "Up to 2 hours" },
    open_ended = { 500, "Over 2 hours" },
)]
fn unlabeled_note_lands_in_exactly_one_time_bucket(estimation: u32, expected_title: &str) {
    let notes = vec![note("note-1", estimation, "")];
    let buckets = project(&notes, &[], &[], &default_time_buckets());

    let holding: Vec<&BucketModel> =
        buckets.iter().filter(|bucket| !bucket.notes.is_empty()).collect();
    assert_eq!(holding.len(), 1);
    assert_eq!(holding[0].title(), expected_title);
}

#[test]
fn labeled_note_never_enters_time_buckets() {
    let notes = vec![note("note-1", 20, "Errands")];
    let buckets =
        project(&notes, &[], &[labeled("bkt-1", "Errands")], &default_time_buckets());

    for bucket in &buckets {
        if bucket.is_labeled() {
            assert_eq!(bucket.notes.len(), 1);
        } else {
            assert!(bucket.notes.is_empty());
        }
    }
}

#[test]
fn labeled_bucket_matches_exact_title_only() {
    let notes = vec![note("note-1", 20, "Errands"), note("note-2", 20, "errands")];
    let buckets = project(&notes, &[], &[labeled("bkt-1", "Errands")], &default_time_buckets());

    let errands = buckets.iter().find(|bucket| bucket.is_labeled()).unwrap();
    assert_eq!(errands.notes.len(), 1);
    assert_eq!(errands.notes[0].id, "note-1");
}

#[test]
fn note_with_orphan_label_appears_nowhere() {
    // The label join key is fragile: no bucket with a matching title means
    // the note is invisible to every bucket view.
    let notes = vec![note("note-1", 20, "Renamed")];
    let buckets = project(&notes, &[], &[labeled("bkt-1", "Errands")], &default_time_buckets());
    assert!(buckets.iter().all(|bucket| bucket.notes.is_empty()));
}

#[test]
fn records_attach_to_their_notes_bucket() {
    let notes = vec![note("note-1", 20, ""), note("note-2", 90, "")];
    let records = vec![open_record("rec-1", "note-1"), completed_record("rec-2", "note-2")];
    let buckets = project(&notes, &records, &[], &default_time_buckets());

    let moderate = buckets.iter().find(|b| b.title() == "Up to 30 mins").unwrap();
    assert_eq!(moderate.activity_records.len(), 1);
    assert_eq!(moderate.activity_records[0].id, "rec-1");

    let long = buckets.iter().find(|b| b.title() == "Up to 2 hours").unwrap();
    assert_eq!(long.activity_records.len(), 1);
    assert_eq!(long.activity_records[0].id, "rec-2");
}

#[test]
fn open_record_moves_note_to_in_progress() {
    let notes = vec![note("note-1", 20, ""), note("note-2", 20, "")];
    let records = vec![open_record("rec-1", "note-1")];
    let buckets = project(&notes, &records, &[], &default_time_buckets());

    let moderate = buckets.iter().find(|b| b.title() == "Up to 30 mins").unwrap();
    assert_eq!(moderate.in_progress.len(), 1);
    assert_eq!(moderate.in_progress[0].id, "note-1");
    assert_eq!(moderate.pending.len(), 1);
    assert_eq!(moderate.pending[0].id, "note-2");
}

#[test]
fn completed_record_leaves_note_pending() {
    // A recurring note that was finished keeps its completed record but is
    // available to start again.
    let notes = vec![note("note-1", 20, "")];
    let records = vec![completed_record("rec-1", "note-1")];
    let buckets = project(&notes, &records, &[], &default_time_buckets());

    let moderate = buckets.iter().find(|b| b.title() == "Up to 30 mins").unwrap();
    assert_eq!(moderate.pending.len(), 1);
    assert!(moderate.in_progress.is_empty());
    assert_eq!(moderate.stats, BucketStats { pending: 1, in_progress: 0, completed: 1 });
}

#[test]
fn stats_agree_with_partitions() {
    let notes = vec![note("note-1", 20, ""), note("note-2", 25, ""), note("note-3", 30, "")];
    let records = vec![
        open_record("rec-1", "note-1"),
        completed_record("rec-2", "note-2"),
        completed_record("rec-3", "note-2"),
    ];
    let buckets = project(&notes, &records, &[], &default_time_buckets());

    for bucket in &buckets {
        assert_eq!(bucket.stats.pending, bucket.pending.len());
        assert_eq!(bucket.stats.in_progress, bucket.in_progress.len());
        assert_eq!(
            bucket.stats.completed,
            bucket.activity_records.iter().filter(|r| !r.is_open()).count()
        );
        assert_eq!(bucket.pending.len() + bucket.in_progress.len(), bucket.notes.len());
    }

    let moderate = buckets.iter().find(|b| b.title() == "Up to 30 mins").unwrap();
    assert_eq!(moderate.stats, BucketStats { pending: 2, in_progress: 1, completed: 2 });
}

#[test]
fn partition_is_complete_across_all_buckets() {
    let notes = vec![
        note("note-1", 5, ""),
        note("note-2", 45, ""),
        note("note-3", 500, ""),
        note("note-4", 5, "Errands"),
    ];
    let records = vec![open_record("rec-1", "note-2")];
    let buckets =
        project(&notes, &records, &[labeled("bkt-1", "Errands")], &default_time_buckets());

    let total: usize =
        buckets.iter().map(|bucket| bucket.stats.pending + bucket.stats.in_progress).sum();
    assert_eq!(total, notes.len());
}

#[test]
fn time_buckets_precede_labeled_in_stored_order() {
    let buckets = project(
        &[],
        &[],
        &[labeled("bkt-1", "Errands"), labeled("bkt-2", "Reading")],
        &default_time_buckets(),
    );

    assert_eq!(buckets.len(), 7);
    assert!(buckets[..5].iter().all(|bucket| !bucket.is_labeled()));
    assert_eq!(buckets[5].title(), "Errands");
    assert_eq!(buckets[6].title(), "Reading");
}
