// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Schema-driven mapping between persisted and client record shapes.
//!
//! Each entity declares a mapping table of [`FieldSpec`]s: the persisted
//! (snake_case wire) key, the client (camelCase) key, and the default used
//! when the persisted value is absent. Two functions consume the table in
//! either direction. The mapping is a strict projection: keys not named in
//! the table are dropped.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Default applied when a persisted field is absent or JSON null.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// Missing value stays null.
    Null,
    /// A fixed string.
    Text(&'static str),
    /// A non-negative integer.
    Uint(u64),
    /// Boolean false.
    False,
}

impl DefaultValue {
    /// Materializes the default as a JSON value.
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Null => Value::Null,
            DefaultValue::Text(s) => Value::String(s.to_string()),
            DefaultValue::Uint(n) => Value::from(n),
            DefaultValue::False => Value::Bool(false),
        }
    }
}

/// One field mapping in an entity schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Logical field name (documentation only).
    pub name: &'static str,
    /// Key in the persisted (wire) shape.
    pub persisted: &'static str,
    /// Key in the client (in-memory) shape.
    pub client: &'static str,
    /// Default when the persisted value is absent or null.
    pub default: DefaultValue,
}

/// An entity's full mapping table.
pub type Schema = &'static [FieldSpec];

fn as_object<'a>(record: &'a Value, direction: &str) -> Result<&'a Map<String, Value>> {
    record.as_object().ok_or_else(|| {
        Error::InvalidInput(format!("{direction} record must be a JSON object, got {record}"))
    })
}

/// Maps a persisted record to its client shape.
///
/// Absent or null persisted values are replaced by the field default,
/// matching the original payloads where optional fields were omitted.
pub fn to_client(schema: Schema, persisted: &Value) -> Result<Map<String, Value>> {
    let record = as_object(persisted, "persisted")?;
    let mut client = Map::new();
    for field in schema {
        let value = match record.get(field.persisted) {
            None | Some(Value::Null) => field.default.to_value(),
            Some(value) => value.clone(),
        };
        client.insert(field.client.to_string(), value);
    }
    Ok(client)
}

/// Maps a client record to its persisted shape.
///
/// No defaults are applied on the way out: a client record produced by
/// [`to_client`] always carries every schema key, so a missing key maps to
/// null rather than silently resurrecting a default.
pub fn to_persisted(schema: Schema, client: &Value) -> Result<Map<String, Value>> {
    let record = as_object(client, "client")?;
    let mut persisted = Map::new();
    for field in schema {
        let value = record.get(field.client).cloned().unwrap_or(Value::Null);
        persisted.insert(field.persisted.to_string(), value);
    }
    Ok(persisted)
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
