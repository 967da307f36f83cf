// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    note_not_found = { Error::NoteNotFound("note-a1b2c3d4".into()), "note-a1b2c3d4" },
    record_not_found = { Error::RecordNotFound("rec-a1b2c3d4".into()), "rec-a1b2c3d4" },
    already_in_progress = { Error::AlreadyInProgress("note-a1b2c3d4".into()), "already in progress" },
    duplicate_title = { Error::DuplicateTitle("Errands".into()), "Errands" },
    validation = { Error::Validation("missing 'notes' array".into()), "notes" },
    backend_write = { Error::BackendWrite("disk full".into()), "disk full" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_unknown_version_display() {
    let err = Error::UnknownVersion { found: "9.0".into(), newest: "1.0".into() };
    let msg = err.to_string();
    assert!(msg.contains("9.0"));
    assert!(msg.contains("1.0"));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
