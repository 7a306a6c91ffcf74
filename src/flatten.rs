use crate::attr::{Attr, Value};
use crate::error::LogError;
use chrono::SecondsFormat;
use std::time::Duration;

/// Ordered field map produced by [`flatten`].
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Convert an attribute list into an ordered field map.
///
/// Scalars map to their JSON value, groups recurse into a nested map. A
/// repeated key overwrites the earlier value and keeps its original
/// position.
///
/// Fails with [`LogError::Unrepresentable`] when a float anywhere in the
/// tree is NaN or infinite.
pub fn flatten(attrs: &[Attr]) -> Result<Fields, LogError> {
    flatten_into(attrs, true)
}

/// Like [`flatten`], but groups that end up empty are dropped instead of
/// becoming `{}`. Used for human-readable output, where an attribute
/// without content is noise.
pub fn flatten_compact(attrs: &[Attr]) -> Result<Fields, LogError> {
    flatten_into(attrs, false)
}

fn flatten_into(attrs: &[Attr], keep_empty_groups: bool) -> Result<Fields, LogError> {
    let mut fields = Fields::with_capacity(attrs.len());
    for attr in attrs {
        let value = match &attr.value {
            Value::Group(inner) => {
                let nested = flatten_into(inner, keep_empty_groups)?;
                if nested.is_empty() && !keep_empty_groups {
                    continue;
                }
                serde_json::Value::Object(nested)
            }
            scalar => scalar_to_json(&attr.key, scalar)?,
        };
        fields.insert(attr.key.clone(), value);
    }
    Ok(fields)
}

fn scalar_to_json(key: &str, value: &Value) -> Result<serde_json::Value, LogError> {
    let json = match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Int(n) => serde_json::Value::from(*n),
        Value::Uint(n) => serde_json::Value::from(*n),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| LogError::Unrepresentable { key: key.to_string() })?,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Duration(d) => serde_json::Value::String(format_duration(*d)),
        Value::Time(t) => serde_json::Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        Value::Json(v) => v.clone(),
        Value::Group(inner) => serde_json::Value::Object(flatten(inner)?),
    };
    Ok(json)
}

// Rounded to the nearest microsecond, saturating at `Duration::MAX`.
fn format_duration(d: Duration) -> String {
    let micros = (d.as_nanos() + 500) / 1_000;
    let rounded = u64::try_from(micros / 1_000_000)
        .map(|secs| Duration::new(secs, (micros % 1_000_000) as u32 * 1_000))
        .unwrap_or(Duration::MAX);
    format!("{rounded:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_empty_input() {
        assert!(flatten(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_flat_attrs_pass_through() {
        let fields = flatten(&[Attr::int("a", 1), Attr::string("b", "x"), Attr::bool("c", false)]).unwrap();
        assert_eq!(serde_json::Value::Object(fields), json!({"a": 1, "b": "x", "c": false}));
    }

    #[test]
    fn test_groups_expand_recursively() {
        let attrs = [
            Attr::int("a", 1),
            Attr::group("g", [Attr::int("b", 2), Attr::int("c", 3)]),
        ];
        let fields = flatten(&attrs).unwrap();
        assert_eq!(
            serde_json::to_string(&fields).unwrap(),
            r#"{"a":1,"g":{"b":2,"c":3}}"#
        );
    }

    #[test]
    fn test_deep_nesting() {
        let attrs = [Attr::group("a", [Attr::group("b", [Attr::group("c", [Attr::int("d", 4)])])])];
        let fields = flatten(&attrs).unwrap();
        assert_eq!(fields["a"]["b"]["c"]["d"], json!(4));
    }

    #[test]
    fn test_empty_group_stays_an_object() {
        let fields = flatten(&[Attr::group("g", Vec::<Attr>::new())]).unwrap();
        assert_eq!(serde_json::to_string(&fields).unwrap(), r#"{"g":{}}"#);
    }

    #[test]
    fn test_compact_drops_empty_groups() {
        let attrs = [
            Attr::group("empty", Vec::<Attr>::new()),
            Attr::group("outer", [Attr::group("inner", Vec::<Attr>::new())]),
            Attr::group("kept", [Attr::int("n", 1)]),
        ];
        let fields = flatten_compact(&attrs).unwrap();
        assert_eq!(serde_json::to_string(&fields).unwrap(), r#"{"kept":{"n":1}}"#);
    }

    #[test]
    fn test_duplicate_keys_overwrite_in_place() {
        let attrs = [Attr::int("a", 1), Attr::int("b", 2), Attr::int("a", 3)];
        let fields = flatten(&attrs).unwrap();
        assert_eq!(serde_json::to_string(&fields).unwrap(), r#"{"a":3,"b":2}"#);
    }

    #[test]
    fn test_preserves_encounter_order() {
        let attrs = [Attr::int("z", 1), Attr::int("a", 2), Attr::int("m", 3)];
        let keys: Vec<_> = flatten(&attrs).unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_scalar_rendering() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let attrs = [
            Attr::duration("took", Duration::from_nanos(1_500_400)),
            Attr::time("at", at),
            Attr::float("ratio", 0.25),
            Attr::json("raw", &json!([1, 2])),
        ];
        let fields = flatten(&attrs).unwrap();
        assert_eq!(fields["took"], json!("1.5ms"));
        assert_eq!(fields["at"], json!("2024-05-01T12:30:00Z"));
        assert_eq!(fields["ratio"], json!(0.25));
        assert_eq!(fields["raw"], json!([1, 2]));
    }

    #[test]
    fn test_duration_rounding() {
        assert_eq!(format_duration(Duration::from_nanos(1_499)), "1µs");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "2µs");
        assert_eq!(format_duration(Duration::from_secs(3)), "3s");
    }

    #[test]
    fn test_huge_duration_does_not_wrap() {
        let rendered = format_duration(Duration::MAX);
        assert_eq!(rendered, format!("{:?}", Duration::MAX));
        assert_eq!(
            format_duration(Duration::from_secs(u64::MAX)),
            format!("{:?}", Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn test_non_finite_float_is_an_error() {
        let attrs = [Attr::group("g", [Attr::float("bad", f64::NAN)])];
        match flatten(&attrs) {
            Err(LogError::Unrepresentable { key }) => assert_eq!(key, "bad"),
            other => panic!("expected Unrepresentable, got {other:?}"),
        }
    }
}
