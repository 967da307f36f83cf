// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for bl-core operations.

use thiserror::Error;

/// All possible errors that can occur in bl-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("note not found: {0}")]
    NoteNotFound(String),

    #[error("activity record not found: {0}")]
    RecordNotFound(String),

    #[error("note already in progress: {0}\n  hint: finish or discard the open activity record first")]
    AlreadyInProgress(String),

    #[error("a bucket titled '{0}' already exists\n  hint: bucket titles must be unique")]
    DuplicateTitle(String),

    #[error("unknown payload version '{found}': newest supported is '{newest}'")]
    UnknownVersion { found: String, newest: String },

    #[error("invalid payload: {0}")]
    Validation(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("backend write failed: {0}")]
    BackendWrite(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for bl-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
