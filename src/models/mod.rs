pub mod generation;
pub mod image;

pub use generation::*;
pub use image::*;

use serde_json::Value;

/// Whether a JSON value counts as set: not null, false, zero or the empty string.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
