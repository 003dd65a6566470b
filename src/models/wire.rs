//! Lenient field decoders shared by the backend wire schemas
//!
//! The backend is inconsistent about scalar types (ids arrive as strings or
//! numbers, amounts as numbers or numeric strings, absent fields as `null`),
//! so wire structs decode through these helpers before translation.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Schema version of the wire structs in this crate
pub const WIRE_SCHEMA_VERSION: u32 = 1;

/// Accept a string, number, bool or null and produce a string (`""` for null)
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(de::Error::custom(format!("expected a scalar, got {}", other))),
    }
}

/// Accept a number, numeric string or null and produce an `f64` (`0.0` for null or blank)
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("number out of range")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid number: {}", s))),
        Some(other) => Err(de::Error::custom(format!("expected a number, got {}", other))),
    }
}

/// Like [`number`] but keeps absence distinct
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => number(value).map(Some).map_err(de::Error::custom),
    }
}
