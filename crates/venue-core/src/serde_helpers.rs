//! Lenient deserializers for columns whose historical data is inconsistent

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a string or numeric id and keep it as a string
pub mod option_id {
    use super::{Deserialize, Deserializer, Value};

    /// Deserialize `"abc"`, `42` or `null` into `Option<String>`
    ///
    /// # Errors
    ///
    /// Returns an error for booleans, arrays and objects.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(serde::de::Error::custom(format!(
                "expected string or number id, got {other}"
            ))),
        }
    }
}

/// Deserialize a list column that may also hold a comma separated string
///
/// # Errors
///
/// Returns an error if the value is neither a string, an array nor null.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()),
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected list or string, got {other}"
        ))),
    }
}

/// Read `null` as the type's default
///
/// # Errors
///
/// Returns an error if a present value does not deserialize as `T`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
