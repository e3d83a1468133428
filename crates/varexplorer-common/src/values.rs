//! Loosely-typed leaf values carried from source payloads into the canonical record.
//!
//! Upstream APIs are inconsistent about scalar typing: AlphaMissense scores
//! arrive as quoted decimals, frequencies as numbers, ClinVar condition lists
//! as strings or arrays. `RawValue` keeps whatever shape arrived; numeric
//! coercion only happens where a caller asks for it.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A single non-null leaf value from a source payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(Number),
    Text(String),
    Flag(bool),
    /// Arrays and objects, kept verbatim for the nested export.
    Structured(Value),
}

/// A field that may be absent. `None` serializes as `null`.
pub type Field = Option<RawValue>;

impl RawValue {
    /// Lift a JSON value into a field. `null` maps to `None`.
    pub fn from_json(value: &Value) -> Field {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(RawValue::Flag(*b)),
            Value::Number(n) => Some(RawValue::Number(n.clone())),
            Value::String(s) => Some(RawValue::Text(s.clone())),
            other => Some(RawValue::Structured(other.clone())),
        }
    }

    /// Returns `None` for NaN and infinities, which JSON cannot carry.
    pub fn from_f64(value: f64) -> Option<Self> {
        Number::from_f64(value).map(RawValue::Number)
    }

    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// Numeric view without coercion: only `Number` qualifies.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce to a finite `f64`.
    ///
    /// Numbers convert directly. Text is trimmed of whitespace and of a
    /// surrounding pair of quotes, then parsed. Everything else is `None`.
    pub fn coerce_f64(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => n.as_f64()?,
            RawValue::Text(s) => {
                let trimmed = s.trim();
                let unquoted = trimmed
                    .strip_prefix('"')
                    .and_then(|t| t.strip_suffix('"'))
                    .unwrap_or(trimmed);
                unquoted.trim().parse::<f64>().ok()?
            }
            RawValue::Flag(_) | RawValue::Structured(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Plain string rendering; structured values render as compact JSON.
    pub fn to_display_string(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
            RawValue::Flag(b) => b.to_string(),
            RawValue::Structured(v) => v.to_string(),
        }
    }

    /// Collapse structured values into their JSON text so the value fits a flat cell.
    pub fn into_scalar(self) -> Self {
        match self {
            RawValue::Structured(v) => RawValue::Text(v.to_string()),
            scalar => scalar,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(Number::from(value))
    }
}
