// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence backends.
//!
//! Storage is one JSON document. Where the bytes live is a collaborator
//! concern behind the [`Backend`] trait: the store only asks to load the
//! document (absent on first run) or replace it. [`FileBackend`] keeps it
//! on disk with atomic replace-on-write; [`MemoryBackend`] keeps it in
//! memory for tests and embedders that persist elsewhere.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::payload;

/// Maximum serialized payload size a backend will accept.
pub const MAX_PAYLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Capability consumed by the store: load or replace the persisted document.
pub trait Backend {
    /// Returns the persisted payload, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<Value>>;

    /// Replaces the persisted payload.
    ///
    /// Fails with [`Error::Validation`] when the payload is missing a
    /// required collection array, or [`Error::BackendWrite`] when the
    /// document cannot be stored.
    fn save(&self, payload: &Value) -> Result<()>;
}

impl<B: Backend> Backend for &B {
    fn load(&self) -> Result<Option<Value>> {
        (*self).load()
    }

    fn save(&self, payload: &Value) -> Result<()> {
        (*self).save(payload)
    }
}

/// File-backed storage: one JSON document, replaced atomically on save.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend storing the document at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileBackend { path: path.into() }
    }

    /// The platform-default document location: `bucketlist/data.json`
    /// under the user data directory.
    pub fn default_path() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("bucketlist").join("data.json"))
            .ok_or_else(|| {
                Error::BackendUnavailable("no platform data directory available".to_string())
            })
    }

    /// Where the document is stored.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Backend for FileBackend {
    fn load(&self) -> Result<Option<Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(Error::BackendUnavailable(format!(
                    "cannot read '{}': {err}",
                    self.path.display()
                )));
            }
        };
        // Unparseable content is corruption, not unavailability: let the
        // json error surface to the caller.
        let document = serde_json::from_str(&text)?;
        Ok(Some(document))
    }

    fn save(&self, payload: &Value) -> Result<()> {
        payload::validate(payload)?;

        let json = serde_json::to_string(payload)?;
        if json.len() > MAX_PAYLOAD_BYTES {
            return Err(Error::BackendWrite(format!(
                "payload is {} bytes, limit is {MAX_PAYLOAD_BYTES}",
                json.len()
            )));
        }

        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            // Write to a sibling temp file, fsync, then rename over the
            // document so readers never observe a partial write.
            let tmp = self.path.with_extension("tmp");
            let mut file = File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        };

        write().map_err(|err| {
            Error::BackendWrite(format!("cannot write '{}': {err}", self.path.display()))
        })?;

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "saved payload");
        Ok(())
    }
}

/// In-memory storage for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: Mutex<Option<Value>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    /// Creates a backend preloaded with a payload.
    pub fn with_payload(payload: Value) -> Self {
        MemoryBackend { document: Mutex::new(Some(payload)) }
    }
}

impl Backend for MemoryBackend {
    fn load(&self) -> Result<Option<Value>> {
        let document = self.document.lock().unwrap_or_else(|err| err.into_inner());
        Ok(document.clone())
    }

    fn save(&self, payload: &Value) -> Result<()> {
        payload::validate(payload)?;
        let mut document = self.document.lock().unwrap_or_else(|err| err.into_inner());
        *document = Some(payload.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
