// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Application state store.
//!
//! The store exclusively owns the canonical collections (notes, activity
//! records, labeled buckets) and funnels every mutation through an explicit
//! command. Each command applies its in-memory mutation first, then writes
//! the full payload to the backend. A failed write does NOT roll the
//! mutation back: the error is returned, and [`Store::last_save_error`]
//! stays set until the next successful write so the UI can warn and retry.
//!
//! There is exactly one logical writer and commands run to completion, so
//! no locking happens here.

use serde_json::Value;

use crate::backend::Backend;
use crate::bucket::{self, BucketModel, TimeRange};
use crate::clock::{ClockSource, SystemClock};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::id;
use crate::migrate;
use crate::note::{ActivityRecord, LabeledBucket, Note, NoteDraft, NoteStatus};
use crate::payload;

/// The mutable in-memory state container.
pub struct Store<B: Backend, C: ClockSource = SystemClock> {
    notes: Vec<Note>,
    activity_records: Vec<ActivityRecord>,
    labeled_buckets: Vec<LabeledBucket>,
    time_buckets: Vec<TimeRange>,
    backend: B,
    clock: C,
    last_save_error: Option<String>,
}

impl<B: Backend> Store<B, SystemClock> {
    /// Creates an empty store over a backend, with the system clock.
    pub fn new(backend: B, config: &Config) -> Self {
        Self::with_clock(backend, config, SystemClock)
    }
}

impl<B: Backend, C: ClockSource> Store<B, C> {
    /// Creates an empty store with a custom clock source.
    pub fn with_clock(backend: B, config: &Config, clock: C) -> Self {
        Store {
            notes: Vec::new(),
            activity_records: Vec::new(),
            labeled_buckets: Vec::new(),
            time_buckets: config.time_buckets.clone(),
            backend,
            clock,
            last_save_error: None,
        }
    }

    /// Loads persisted state: backend, then the migration pipeline, then client shapes.
    ///
    /// An empty backend (first run) leaves the collections empty. Payload
    /// corruption and unknown versions propagate: they must be surfaced,
    /// not swallowed.
    pub fn load_all(&mut self) -> Result<()> {
        let raw = match self.backend.load()? {
            Some(raw) => raw,
            None => {
                tracing::info!("no persisted data found, starting empty");
                self.notes.clear();
                self.activity_records.clear();
                self.labeled_buckets.clear();
                return Ok(());
            }
        };

        let migrated = migrate::migrate(raw)?;
        let collections = payload::decode(&migrated)?;
        self.notes = collections.notes;
        self.activity_records = collections.activity_records;
        self.labeled_buckets = collections.labeled_buckets;

        tracing::info!(
            notes = self.notes.len(),
            activity_records = self.activity_records.len(),
            labeled_buckets = self.labeled_buckets.len(),
            "loaded persisted data"
        );
        Ok(())
    }

    /// Creates a note with a fresh id.
    pub fn create_note(&mut self, draft: NoteDraft) -> Result<Note> {
        let now = self.clock.now();
        let note_id = id::generate_unique_id(id::NOTE_PREFIX, &draft.description, &now, |id| {
            self.notes.iter().any(|note| note.id == id)
        });
        let note = Note::new(note_id, draft);
        self.notes.push(note.clone());
        self.persist()?;
        Ok(note)
    }

    /// Starts work on a note by opening an activity record for it.
    ///
    /// Fails with [`Error::NoteNotFound`] or, when an open record already
    /// references the note, [`Error::AlreadyInProgress`].
    pub fn start_note(&mut self, note_id: &str) -> Result<ActivityRecord> {
        let note = self.find_note(note_id)?.clone();
        if self.open_record_for(note_id).is_some() {
            return Err(Error::AlreadyInProgress(note_id.to_string()));
        }

        let now = self.clock.now();
        let record_id = id::generate_unique_id(id::RECORD_PREFIX, &note.id, &now, |id| {
            self.activity_records.iter().any(|record| record.id == id)
        });
        let record = ActivityRecord::create_from_note(&note, record_id, now);
        self.activity_records.push(record.clone());
        self.persist()?;
        Ok(record)
    }

    /// Completes an open activity record.
    ///
    /// The record is updated in place (history is kept). The owning note is
    /// removed unless it is recurring.
    pub fn finish_note(&mut self, record_id: &str) -> Result<ActivityRecord> {
        let record = self.find_record(record_id)?.clone();
        // Read the owning note before touching the record: the recurring
        // flag must come from live state, not a denormalized copy.
        let note = self.notes.iter().find(|note| note.id == record.note_id).cloned();

        let finished = record.finish(self.clock.now())?;
        self.replace_record(&finished);

        if let Some(note) = note {
            if !note.recurring {
                self.notes.retain(|candidate| candidate.id != note.id);
            }
        }

        self.persist()?;
        Ok(finished)
    }

    /// Re-opens an activity record by resetting its start time.
    ///
    /// Fails with [`Error::InvalidState`] if the record is already completed.
    pub fn restart_note(&mut self, record_id: &str) -> Result<ActivityRecord> {
        let record = self.find_record(record_id)?.clone();
        let restarted = record.restart(self.clock.now())?;
        self.replace_record(&restarted);
        self.persist()?;
        Ok(restarted)
    }

    /// Abandons an open activity record without completing it.
    ///
    /// The record is removed outright and no history is kept. The note stays.
    pub fn discard_note(&mut self, record_id: &str) -> Result<()> {
        let record = self.find_record(record_id)?;
        if !record.is_open() {
            return Err(Error::InvalidState(format!(
                "activity record '{record_id}' is completed and part of history"
            )));
        }
        self.activity_records.retain(|record| record.id != record_id);
        self.persist()?;
        Ok(())
    }

    /// Deletes a note.
    ///
    /// Open activity records referencing it are cascade-deleted; completed
    /// records stay as history.
    pub fn delete_note(&mut self, note_id: &str) -> Result<Note> {
        let position = self
            .notes
            .iter()
            .position(|note| note.id == note_id)
            .ok_or_else(|| Error::NoteNotFound(note_id.to_string()))?;
        let note = self.notes.remove(position);
        self.activity_records.retain(|record| record.note_id != note_id || !record.is_open());
        self.persist()?;
        Ok(note)
    }

    /// Creates a labeled bucket.
    ///
    /// Fails with [`Error::DuplicateTitle`] on an exact title collision.
    /// Empty titles are rejected: an empty label means "unlabeled".
    pub fn add_labeled_bucket(&mut self, title: &str) -> Result<LabeledBucket> {
        if title.is_empty() {
            return Err(Error::InvalidInput("bucket title cannot be empty".to_string()));
        }
        if self.labeled_buckets.iter().any(|bucket| bucket.title == title) {
            return Err(Error::DuplicateTitle(title.to_string()));
        }

        let now = self.clock.now();
        let bucket_id = id::generate_unique_id(id::BUCKET_PREFIX, title, &now, |id| {
            self.labeled_buckets.iter().any(|bucket| bucket.id == id)
        });
        let bucket = LabeledBucket::new(bucket_id, title.to_string(), now);
        self.labeled_buckets.push(bucket.clone());
        self.persist()?;
        Ok(bucket)
    }

    /// Serializes the current state as a RawPayload for backup export.
    pub fn export(&self) -> Result<Value> {
        payload::encode(&self.notes, &self.activity_records, &self.labeled_buckets)
    }

    /// Replaces all state wholesale from an uploaded RawPayload.
    ///
    /// The payload runs through the migration pipeline first; nothing is
    /// replaced if it fails to migrate or decode.
    pub fn import(&mut self, raw: Value) -> Result<()> {
        let migrated = migrate::migrate(raw)?;
        let collections = payload::decode(&migrated)?;
        self.notes = collections.notes;
        self.activity_records = collections.activity_records;
        self.labeled_buckets = collections.labeled_buckets;
        self.persist()?;
        Ok(())
    }

    /// Projects the current collections into bucket view-models.
    ///
    /// Always freshly computed, never cached across mutations.
    pub fn buckets(&self) -> Vec<BucketModel> {
        bucket::project(
            &self.notes,
            &self.activity_records,
            &self.labeled_buckets,
            &self.time_buckets,
        )
    }

    /// Open activity records paired with their notes.
    ///
    /// Records whose note no longer exists are skipped.
    pub fn in_progress_records(&self) -> Vec<(&ActivityRecord, &Note)> {
        self.activity_records
            .iter()
            .filter(|record| record.is_open())
            .filter_map(|record| {
                self.notes.iter().find(|note| note.id == record.note_id).map(|note| (record, note))
            })
            .collect()
    }

    /// Derived status of a note.
    pub fn note_status(&self, note_id: &str) -> Result<NoteStatus> {
        self.find_note(note_id)?;
        Ok(match self.open_record_for(note_id) {
            Some(_) => NoteStatus::InProgress,
            None => NoteStatus::Pending,
        })
    }

    /// All notes, in creation order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// All activity records, open and completed.
    pub fn activity_records(&self) -> &[ActivityRecord] {
        &self.activity_records
    }

    /// All labeled buckets, in creation order.
    pub fn labeled_buckets(&self) -> &[LabeledBucket] {
        &self.labeled_buckets
    }

    /// The time-bucket table the store projects with.
    pub fn time_buckets(&self) -> &[TimeRange] {
        &self.time_buckets
    }

    /// The last persistence failure, until a write succeeds again.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    fn find_note(&self, note_id: &str) -> Result<&Note> {
        self.notes
            .iter()
            .find(|note| note.id == note_id)
            .ok_or_else(|| Error::NoteNotFound(note_id.to_string()))
    }

    fn find_record(&self, record_id: &str) -> Result<&ActivityRecord> {
        self.activity_records
            .iter()
            .find(|record| record.id == record_id)
            .ok_or_else(|| Error::RecordNotFound(record_id.to_string()))
    }

    fn open_record_for(&self, note_id: &str) -> Option<&ActivityRecord> {
        self.activity_records.iter().find(|record| record.note_id == note_id && record.is_open())
    }

    fn replace_record(&mut self, updated: &ActivityRecord) {
        if let Some(slot) = self.activity_records.iter_mut().find(|record| record.id == updated.id)
        {
            *slot = updated.clone();
        }
    }

    /// Writes the full payload to the backend.
    ///
    /// The in-memory mutation that preceded this call stands either way.
    fn persist(&mut self) -> Result<()> {
        let payload =
            payload::encode(&self.notes, &self.activity_records, &self.labeled_buckets)?;
        match self.backend.save(&payload) {
            Ok(()) => {
                self.last_save_error = None;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "persistence write failed, in-memory state kept");
                self.last_save_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
