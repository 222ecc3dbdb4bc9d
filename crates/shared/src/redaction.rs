//! Redaction of sensitive fields in payloads destined for logs.
//!
//! A [`Sanitizer`] returns a copy of a JSON payload in which every value
//! stored under a sensitive key is masked. The input is never modified, so
//! the payload returned to the caller stays intact.

use serde_json::{Map, Value};
use thiserror::Error;

/// Marker written in place of a sensitive value.
pub const REDACTED: &str = "[REDACTED]";

/// Field names masked when no explicit list is configured.
pub const DEFAULT_SENSITIVE_FIELDS: &[&str] = &["password", "access_token"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedactionError {
    /// The sensitive field holds a value that has no masked form.
    #[error("Unsupported type for sensitive field '{field}': {kind}")]
    UnsupportedType { field: String, kind: &'static str },
}

/// Masks configured field names in JSON payloads.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    sensitive_fields: Vec<String>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVE_FIELDS.iter().copied())
    }
}

impl Sanitizer {
    pub fn new<I, S>(sensitive_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sensitive_fields: sensitive_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        self.sensitive_fields.iter().any(|f| f == key)
    }

    /// Returns a masked copy of `value`.
    ///
    /// Sensitive keys are looked up in every object, including objects
    /// nested in arrays. Strings become [`REDACTED`], arrays become one
    /// marker per element and objects keep their keys with every value
    /// masked. Numbers, booleans and nulls under a sensitive key are
    /// rejected, so callers can skip logging the payload entirely.
    pub fn sanitize(&self, value: &Value) -> Result<Value, RedactionError> {
        match value {
            Value::Object(map) => self.sanitize_object(map).map(Value::Object),
            Value::Array(items) => items
                .iter()
                .map(|item| self.sanitize(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn sanitize_object(&self, map: &Map<String, Value>) -> Result<Map<String, Value>, RedactionError> {
        let mut out = Map::with_capacity(map.len());
        for (key, value) in map {
            let masked = if self.is_sensitive(key) {
                mask(key, value)?
            } else {
                self.sanitize(value)?
            };
            out.insert(key.clone(), masked);
        }
        Ok(out)
    }
}

fn mask(field: &str, value: &Value) -> Result<Value, RedactionError> {
    match value {
        Value::String(_) => Ok(Value::String(REDACTED.to_string())),
        Value::Array(items) => Ok(Value::Array(
            items
                .iter()
                .map(|_| Value::String(REDACTED.to_string()))
                .collect(),
        )),
        Value::Object(map) => Ok(Value::Object(
            map.keys()
                .map(|k| (k.clone(), Value::String(REDACTED.to_string())))
                .collect(),
        )),
        other => Err(RedactionError::UnsupportedType {
            field: field.to_string(),
            kind: kind_of(other),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
