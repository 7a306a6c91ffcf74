use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Value carried by an [`Attr`].
///
/// `Group` nests an ordered list of attributes under the parent key and
/// may itself contain further groups.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    Json(serde_json::Value),
    Group(Vec<Attr>),
}

impl Value {
    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Uint(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

/// A key/value pair attached to a log record.
///
/// Keys are not required to be unique within a record or group. When
/// attributes are flattened, a repeated key overwrites the earlier value.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Attr {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Attr::new(key, Value::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: impl Into<i64>) -> Self {
        Attr::new(key, Value::Int(value.into()))
    }

    pub fn uint(key: impl Into<String>, value: impl Into<u64>) -> Self {
        Attr::new(key, Value::Uint(value.into()))
    }

    pub fn float(key: impl Into<String>, value: impl Into<f64>) -> Self {
        Attr::new(key, Value::Float(value.into()))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Attr::new(key, Value::Bool(value))
    }

    /// Duration attribute, rendered as text rounded to microseconds
    /// (`"1.5ms"`).
    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Attr::new(key, Value::Duration(value))
    }

    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Attr::new(key, Value::Time(value))
    }

    /// Named group of attributes.
    ///
    /// ```
    /// use ctxlog::attr::Attr;
    ///
    /// let attr = Attr::group("request", [
    ///     Attr::string("method", "GET"),
    ///     Attr::int("status", 200),
    /// ]);
    /// assert!(attr.value.is_group());
    /// ```
    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Attr::new(key, Value::Group(attrs.into_iter().collect()))
    }

    /// Error attribute under the `error` key.
    pub fn err(error: &dyn std::error::Error) -> Self {
        Attr::string("error", error.to_string())
    }

    /// Attribute holding an arbitrary serializable payload.
    ///
    /// The value is serialized eagerly. If that fails, the attribute
    /// carries the serializer's error message instead.
    pub fn json<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Attr::new(key, Value::Json(v)),
            Err(e) => Attr::string(key, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_typed_constructors() {
        assert_eq!(Attr::int("n", 7i32).value, Value::Int(7));
        assert_eq!(Attr::uint("n", 7u8).value, Value::Uint(7));
        assert_eq!(Attr::float("f", 1.5f32).value, Value::Float(1.5));
        assert_eq!(Attr::bool("b", true).value, Value::Bool(true));
        assert_eq!(Attr::string("s", "x").value, Value::String("x".into()));
    }

    #[test]
    fn test_err_uses_error_key() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let attr = Attr::err(&err);
        assert_eq!(attr.key, "error");
        assert_eq!(attr.value, Value::String("disk gone".into()));
    }

    #[test]
    fn test_json_payload() {
        let mut payload = HashMap::new();
        payload.insert("id", 3);
        let attr = Attr::json("payload", &payload);
        assert_eq!(attr.value, Value::Json(serde_json::json!({"id": 3})));
    }

    #[test]
    fn test_json_payload_failure_becomes_string() {
        // Maps with non-string keys cannot be encoded as JSON objects.
        let mut payload = HashMap::new();
        payload.insert(vec![1u8], 3);
        let attr = Attr::json("payload", &payload);
        assert!(matches!(attr.value, Value::String(_)));
    }

    #[test]
    fn test_group_collects_in_order() {
        let attr = Attr::group("g", vec![Attr::int("b", 2), Attr::int("c", 3)]);
        match attr.value {
            Value::Group(inner) => {
                let keys: Vec<_> = inner.iter().map(|a| a.key.as_str()).collect();
                assert_eq!(keys, ["b", "c"]);
            }
            other => panic!("expected group, got {other:?}"),
        }
    }
}
