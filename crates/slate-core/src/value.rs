//! Values bound into SQL statements as parameters.

use serde_json::Value;

/// A scalar bound to a statement placeholder. Never rendered into SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl BindValue {
    /// Convert a JSON scalar. Arrays and objects have no SQL equivalent and yield `None`.
    ///
    /// Booleans map to `0`/`1`, matching SQLite's own representation.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(BindValue::Null),
            Value::Bool(b) => Some(BindValue::Integer(i64::from(*b))),
            Value::Number(n) => n
                .as_i64()
                .map(BindValue::Integer)
                .or_else(|| n.as_f64().map(BindValue::Real)),
            Value::String(s) => Some(BindValue::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Integer(value)
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Text(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Text(value.to_string())
    }
}

impl<T: Into<BindValue>> From<Option<T>> for BindValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(BindValue::Null)
    }
}
