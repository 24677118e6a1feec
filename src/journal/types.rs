//! Journal entry type definitions.
//!
//! Defines [`JournalEntry`] (one day's record) and [`EntryPatch`] (a partial
//! update applied as a shallow merge).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StoreError;

/// One journal record, keyed by a date-like `id` (`yyyy-mm-dd`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Lookup key. Not unique: duplicates may coexist.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub todo: Vec<String>,
    #[serde(default)]
    pub wins: Vec<String>,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub reflection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspiration: Option<String>,
    /// Generated commentary, absent until a client merges it in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    /// Client-supplied fields this model does not name, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JournalEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Decode a client payload. Type mismatches become [`StoreError::Validation`].
    ///
    /// A falsy `id` (`null`, `false`, `0`, `""`) counts as missing; a number or
    /// `true` is kept as its text.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        let Value::Object(mut map) = value else {
            return Err(StoreError::Validation("entry must be a JSON object".into()));
        };
        match map.remove("id") {
            Some(Value::Null) | Some(Value::Bool(false)) | None => {}
            Some(Value::String(s)) if s.is_empty() => {}
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {}
            Some(id @ (Value::String(_) | Value::Number(_) | Value::Bool(true))) => {
                map.insert("id".into(), Value::String(value_to_text(&id)));
            }
            Some(other) => {
                return Err(StoreError::Validation(format!("invalid entry: bad id {other}")))
            }
        }
        serde_json::from_value(Value::Object(map))
            .map_err(|e| StoreError::Validation(format!("invalid entry: {e}")))
    }

    /// Decode one element of a stored snapshot without rejecting it.
    ///
    /// `null` becomes the field default; a scalar, list or object in the wrong slot
    /// is converted to text (lists joined with `,`), and a lone value in a list slot
    /// becomes a one-element list. Returns `None` only for a non-object element.
    pub fn from_stored(value: Value) -> Option<Self> {
        let Value::Object(mut map) = value else {
            return None;
        };
        let mut take_text = |key: &str| match map.remove(key) {
            None | Some(Value::Null) => None,
            Some(v) => Some(value_to_text(&v)),
        };
        let id = take_text("id").unwrap_or_default();
        let reflection = take_text("reflection").unwrap_or_default();
        let quote = take_text("quote");
        let inspiration = take_text("inspiration");
        let feedback = take_text("feedback");

        let mut take_list = |key: &str| match map.remove(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Null => String::new(),
                    other => value_to_text(other),
                })
                .collect(),
            Some(other) => vec![value_to_text(&other)],
        };
        let todo = take_list("todo");
        let wins = take_list("wins");
        let emotions = take_list("emotions");

        Some(Self {
            id,
            todo,
            wins,
            emotions,
            reflection,
            quote,
            inspiration,
            feedback,
            extra: map,
        })
    }

    /// Text matched by search: id, lists and reflection, lists comma-joined.
    pub fn haystack(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.id,
            self.todo.join(","),
            self.wins.join(","),
            self.emotions.join(","),
            self.reflection
        )
    }
}

/// Render a JSON value as text: strings as-is, lists comma-joined, objects as JSON.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// A partial update: the keys present overwrite the entry's, the rest are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch(Map<String, Value>);

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(StoreError::Validation("update must be a JSON object".into())),
        }
    }

    /// Builder-style setter, mostly for callers outside the HTTP layer.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Merge onto `entry`, returning the merged copy. `entry` itself is not touched,
    /// so a failed merge leaves the stored record intact.
    pub fn apply_to(&self, entry: &JournalEntry) -> Result<JournalEntry, StoreError> {
        let mut merged = match serde_json::to_value(entry) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(StoreError::Validation(format!(
                    "entry did not serialize to an object: {other}"
                )))
            }
            Err(e) => return Err(StoreError::Validation(format!("invalid entry: {e}"))),
        };
        for (key, value) in &self.0 {
            merged.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(merged))
            .map_err(|e| StoreError::Validation(format!("invalid update: {e}")))
    }
}
