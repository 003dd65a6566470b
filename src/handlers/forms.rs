//! Form input
//!
//! Drafts are edited as JSON objects: one field at a time from the shell, or
//! merged from a JSON/TOML file.

use std::path::Path;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::utils::errors::{PgAdminError, Result};

/// Set one field of `draft` from text typed in the shell.
///
/// The text is tried as a JSON literal first (numbers, `null`, booleans)
/// and then as a plain string.
pub fn apply_field<D>(draft: &D, field: &str, raw: &str) -> Result<D>
where
    D: Serialize + DeserializeOwned,
{
    let mut object = to_object(draft)?;
    if !object.contains_key(field) {
        let known: Vec<&str> = object.keys().map(String::as_str).collect();
        return Err(PgAdminError::InvalidInput(format!(
            "Unknown field '{}'. Fields: {}",
            field,
            known.join(", ")
        )));
    }

    let candidates = [serde_json::from_str::<Value>(raw).ok(), Some(Value::String(raw.to_string()))];
    for candidate in candidates.into_iter().flatten() {
        object.insert(field.to_string(), candidate);
        if let Ok(updated) = serde_json::from_value::<D>(Value::Object(object.clone())) {
            return Ok(updated);
        }
    }

    Err(PgAdminError::InvalidInput(format!("Invalid value for '{}': {}", field, raw)))
}

/// Merge the fields found in a JSON or TOML file over `draft`
pub async fn fill_from_file<D>(draft: &D, path: &Path) -> Result<D>
where
    D: Serialize + DeserializeOwned,
{
    let contents = tokio::fs::read_to_string(path).await?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));

    let incoming: Value = if is_toml {
        let table: toml::Table = toml::from_str(&contents)?;
        serde_json::to_value(table)?
    } else {
        serde_json::from_str(&contents)?
    };

    merge(draft, incoming)
}

/// Overlay the keys of `incoming` onto `draft`
pub fn merge<D>(draft: &D, incoming: Value) -> Result<D>
where
    D: Serialize + DeserializeOwned,
{
    let Value::Object(incoming) = incoming else {
        return Err(PgAdminError::InvalidInput("Form file must contain a table of fields".to_string()));
    };

    let mut object = to_object(draft)?;
    for (key, value) in incoming {
        if !object.contains_key(&key) {
            return Err(PgAdminError::InvalidInput(format!("Unknown field '{}'", key)));
        }
        object.insert(key, value);
    }

    Ok(serde_json::from_value(Value::Object(object))?)
}

fn to_object<D: Serialize>(draft: &D) -> Result<Map<String, Value>> {
    match serde_json::to_value(draft)? {
        Value::Object(object) => Ok(object),
        _ => Err(PgAdminError::InvalidInput("Form is not a set of fields".to_string())),
    }
}
