//! Submission records
//!
//! Inbound payloads are kept as a permissive JSON object so that any extra
//! fields the caller sends are persisted verbatim. Validation only checks
//! that the per-endpoint required fields are present.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::error::StorageError;

/// Required fields of a booking submission (dotted paths reach into objects)
pub const BOOKING_REQUIRED_FIELDS: &[&str] = &["id", "contact.name", "contact.phone"];

/// Required fields of a free-consult lead submission
pub const LEAD_REQUIRED_FIELDS: &[&str] =
    &["name", "phone", "concern", "city", "preferredTime", "source"];

/// A submission record as received from the client
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    fields: Map<String, Value>,
}

impl SubmissionRecord {
    /// Parse a request body; anything but a JSON object is rejected
    pub fn from_slice(body: &[u8]) -> Result<Self, StorageError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| StorageError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, StorageError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(StorageError::Parse(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Fail with the first required field that is missing
    pub fn require(&self, required: &[&str]) -> Result<(), StorageError> {
        match required.iter().find(|path| !is_present(self.get(path))) {
            Some(missing) => Err(StorageError::MissingField((*missing).to_string())),
            None => Ok(()),
        }
    }

    /// Look up a field by dotted path, e.g. `contact.phone`
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.fields.get(first)?, |value, segment| {
            value.as_object()?.get(segment)
        })
    }

    /// Record identifier rendered as a file-name-safe string
    ///
    /// Accepts strings and numbers. Identifiers that could escape the target
    /// directory are refused.
    pub fn id(&self) -> Result<String, StorageError> {
        let id = match self.fields.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(_) | Value::Null) | None => {
                return Err(StorageError::MissingField("id".to_string()))
            }
            Some(_) => return Err(StorageError::invalid("id", "must be a string or number")),
        };

        if id.contains(['/', '\\', '~']) || id.contains("..") {
            return Err(StorageError::invalid(
                "id",
                "must not contain path separators or traversal sequences",
            ));
        }
        Ok(id)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Insert unless the field already holds a filled-in value
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        if !is_present(self.fields.get(key)) {
            self.set(key, value);
        }
    }

    /// Default `timestamp` to the receive time
    pub fn stamp(&mut self, received_at: DateTime<Utc>) {
        self.set_default(
            "timestamp",
            received_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.fields)
    }

    /// Single-line form used by the append-only log
    pub fn to_log_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(&self.fields)?;
        line.push('\n');
        Ok(line)
    }

    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Presence follows form semantics: empty strings, `false`, zero and null
/// count as not filled in.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
