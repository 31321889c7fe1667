//! Lenient field decoders for the service's JSON encoding.
//!
//! The backend encodes absent values as `false`, sends some numbers as
//! strings, and serializes an empty mapping as `[]`. These helpers accept
//! exactly those variants and reject everything else.

use std::collections::HashMap;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text field that may arrive as a string, a number, `false`, or `null`.
///
/// Numbers keep their decimal text; `false` and `null` mean absent.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(false) | Value::Null => Ok(None),
        other => Err(D::Error::custom(format!(
            "expected text, number, false or null, got {other}"
        ))),
    }
}

/// Small dimension (pixels) that may be a number, numeric string, `false`, or `null`.
pub(crate) fn optional_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(false) | Value::Null => Ok(None),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        other => {
            let value = integer_from_value(&other).map_err(D::Error::custom)?;
            u32::try_from(value)
                .map(Some)
                .map_err(|_| D::Error::custom(format!("dimension {value} out of range")))
        }
    }
}

/// Non-negative integer that may be a JSON number or a numeric string.
pub(crate) fn unsigned_integer<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    integer_from_value(&value).map_err(D::Error::custom)
}

/// Mapping keyed by id; `[]` and `null` decode as an empty mapping.
pub(crate) fn map_or_empty<'de, D, T>(deserializer: D) -> Result<HashMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value(value)
                    .map(|record| (key.clone(), record))
                    .map_err(|e| D::Error::custom(format!("entry '{key}': {e}")))
            })
            .collect(),
        Value::Null => Ok(HashMap::new()),
        Value::Array(items) if items.is_empty() => Ok(HashMap::new()),
        other => Err(D::Error::custom(format!(
            "expected mapping of records, got {other}"
        ))),
    }
}

fn integer_from_value(value: &Value) -> Result<u64, String> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| format!("expected non-negative integer, got {number}")),
        Value::String(text) => text
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("expected non-negative integer, got '{text}'")),
        other => Err(format!("expected non-negative integer, got {other}")),
    }
}
