// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Organizer configuration.
//!
//! Configuration is stored in `config.toml` and includes:
//! - `data_path`: optional override for where the data document lives
//! - `time_buckets`: the time-estimate ranges notes are grouped by
//!
//! A missing config file is not an error: [`Config::default`] carries the
//! built-in bucket table and the platform-default data path.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::FileBackend;
use crate::bucket::{default_time_buckets, TimeRange};
use crate::error::{Error, Result};

/// Name of the config file inside the app's config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Organizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Optional path for the data document (absolute, or relative to the
    /// process working directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    /// Time-bucket table: ascending, non-overlapping inclusive ranges with
    /// only the last one unbounded.
    #[serde(default = "default_time_buckets")]
    pub time_buckets: Vec<TimeRange>,
}

impl Default for Config {
    fn default() -> Self {
        Config { data_path: None, time_buckets: default_time_buckets() }
    }
}

impl Config {
    /// Loads and validates configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("failed to read config: {}", err)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|err| Error::Config(format!("failed to parse config: {}", err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|err| Error::Config(format!("failed to serialize config: {}", err)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Checks the time-bucket table keeps every estimate in exactly one range.
    pub fn validate(&self) -> Result<()> {
        if self.time_buckets.is_empty() {
            return Err(Error::Config("time bucket table cannot be empty".to_string()));
        }

        for pair in self.time_buckets.windows(2) {
            let (range, next) = (&pair[0], &pair[1]);
            let max = match range.max {
                Some(max) => max,
                None => {
                    return Err(Error::Config(format!(
                        "range '{}' is unbounded but not last",
                        range.title
                    )));
                }
            };
            if max < range.min {
                return Err(Error::Config(format!("range '{}' is empty", range.title)));
            }
            if next.min <= max {
                return Err(Error::Config(format!(
                    "ranges '{}' and '{}' overlap or are out of order",
                    range.title, next.title
                )));
            }
        }

        if let Some(last) = self.time_buckets.last() {
            if let Some(max) = last.max {
                if max < last.min {
                    return Err(Error::Config(format!("range '{}' is empty", last.title)));
                }
            }
        }

        Ok(())
    }

    /// Resolves where the data document lives: the configured override, or
    /// the platform default.
    pub fn resolve_data_path(&self) -> Result<PathBuf> {
        match &self.data_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => FileBackend::default_path(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
