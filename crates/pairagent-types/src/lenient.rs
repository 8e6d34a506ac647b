//! Field-by-field request decoding
//!
//! Request bodies from the dashboard and from LLM-written plans are loosely
//! typed. A field that is missing or has the wrong type falls back to its
//! default while every well-typed sibling is kept.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Result of a lenient decode
#[derive(Debug, Clone, PartialEq)]
pub struct Lenient<T> {
    pub value: T,
    /// Top-level keys dropped because they did not fit
    pub skipped: Vec<String>,
}

/// Decode `body` into `T`, dropping only the fields that do not fit.
///
/// `T` is expected to carry `#[serde(default)]` so that any subset of its
/// fields deserializes. Non-object bodies yield `T::default()`.
pub fn from_value<T>(body: &Value) -> Lenient<T>
where
    T: DeserializeOwned + Default,
{
    let Value::Object(fields) = body else {
        return Lenient {
            value: T::default(),
            skipped: Vec::new(),
        };
    };

    if let Ok(value) = T::deserialize(body) {
        return Lenient {
            value,
            skipped: Vec::new(),
        };
    }

    let mut accepted = Map::new();
    let mut skipped = Vec::new();
    for (key, field) in fields {
        accepted.insert(key.clone(), field.clone());
        if T::deserialize(&Value::Object(accepted.clone())).is_err() {
            accepted.remove(key);
            skipped.push(key.clone());
        }
    }

    Lenient {
        value: T::deserialize(&Value::Object(accepted)).unwrap_or_default(),
        skipped,
    }
}
