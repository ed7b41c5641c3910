//! Tagged argument values consumed by placeholders.
//!
//! Arguments arrive from the embedding application as one closed set of
//! variants rather than ad hoc runtime inspection: every native type is
//! converted into a `Value` at the call boundary, and all coercion logic
//! downstream operates over this enum only.
//!
//! # Type Decisions
//!
//! **Why `IndexMap` for the `Map` variant?**
//! Associative placeholders (`?A*`) expand collection entries in iteration
//! order, and that order is observable in the produced SQL. `IndexMap`
//! preserves insertion order; `HashMap` would make expansion
//! nondeterministic and `BTreeMap` would silently re-sort keys.
//!
//! **Why "integer"/"double"/"boolean" type names?**
//! Error messages report the runtime type of a mismatched argument. The
//! names follow the conventional SQL-adjacent vocabulary (`double`, not
//! `f64`) so messages read naturally next to the query text they quote.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

/// One runtime argument value, consumed by exactly one placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL / absent value
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed 64-bit integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Ordered sequence, for positional collection placeholders (`?a*`)
    Seq(Vec<Value>),
    /// Insertion-ordered string-keyed map, for associative placeholders (`?A*`)
    Map(IndexMap<String, Value>),
}

fn integer_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid integer pattern"))
}

fn float_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?[0-9]+\.[0-9]+$").expect("valid float pattern"))
}

impl Value {
    /// Runtime type name used in mismatch error messages.
    ///
    /// Both collection variants report `array`: the distinction between
    /// positional and associative collections is a property of the
    /// placeholder, not of the value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "double",
            Value::Str(_) => "string",
            Value::Seq(_) | Value::Map(_) => "array",
        }
    }

    /// True if the value is integer-shaped: a native integer, or a string
    /// matching an optional sign followed by digits with no decimal point.
    ///
    /// Numeric strings and native numbers are interchangeable for the
    /// integer/float placeholder targets; the distinguishing test is shape,
    /// not storage representation. `"123"` is integer-shaped, `"123.0"`
    /// is not.
    pub fn is_integer_shaped(&self) -> bool {
        match self {
            Value::Int(_) => true,
            Value::Str(s) => integer_pattern().is_match(s),
            _ => false,
        }
    }

    /// True if the value is float-shaped: a native float, or a string
    /// matching an optional sign, digits, a literal decimal point, and
    /// digits.
    pub fn is_float_shaped(&self) -> bool {
        match self {
            Value::Float(_) => true,
            Value::Str(s) => float_pattern().is_match(s),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<IndexMap<String, T>> for Value {
    fn from(v: IndexMap<String, T>) -> Self {
        Value::Map(v.into_iter().map(|(k, val)| (k, val.into())).collect())
    }
}

/// Ordered string-keyed map argument from an array of pairs.
///
/// Shorthand for associative placeholder arguments: insertion order is
/// the array order.
pub fn map_of<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<IndexMap<String, Value>>(),
    )
}

/// Conversion for callers that already hold deserialized JSON.
///
/// JSON numbers become `Int` when they fit `i64`, `Float` otherwise.
/// Object key order is preserved.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, val)| (k, Value::from(val)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Null, "NULL")]
    #[case(Value::Bool(true), "boolean")]
    #[case(Value::Int(7), "integer")]
    #[case(Value::Float(7.5), "double")]
    #[case(Value::Str("x".into()), "string")]
    #[case(Value::Seq(vec![]), "array")]
    #[case(Value::Map(IndexMap::new()), "array")]
    fn test_type_names(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.type_name(), expected);
    }

    #[rstest]
    #[case("123", true)]
    #[case("+123", true)]
    #[case("-5", true)]
    #[case("123.0", false)]
    #[case("12e3", false)]
    #[case("2+junk", false)]
    #[case("", false)]
    fn test_integer_shaped_strings(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(Value::Str(input.to_string()).is_integer_shaped(), expected);
    }

    #[rstest]
    #[case("123.0", true)]
    #[case("-0.5", true)]
    #[case("+1.25", true)]
    #[case("123", false)]
    #[case(".5", false)]
    #[case("5.", false)]
    #[case("1e5", false)]
    fn test_float_shaped_strings(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(Value::Str(input.to_string()).is_float_shaped(), expected);
    }

    #[test]
    fn test_native_numbers_are_shaped() {
        assert!(Value::Int(1).is_integer_shaped());
        assert!(!Value::Int(1).is_float_shaped());
        assert!(Value::Float(1.0).is_float_shaped());
        assert!(!Value::Float(1.0).is_integer_shaped());
    }

    #[test]
    fn test_bool_is_not_numeric_shaped() {
        assert!(!Value::Bool(true).is_integer_shaped());
        assert!(!Value::Bool(true).is_float_shaped());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(3i64)), Value::Int(3));
    }

    #[test]
    fn test_from_vec() {
        let value = Value::from(vec![1i64, 2, 3]);
        assert_eq!(
            value,
            Value::Seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn test_from_json_preserves_object_order() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"zeta": 1, "alpha": "two", "mid": null}"#).unwrap();
        let value = Value::from(json);
        match value {
            Value::Map(map) => {
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
                assert_eq!(map["zeta"], Value::Int(1));
                assert_eq!(map["alpha"], Value::Str("two".into()));
                assert_eq!(map["mid"], Value::Null);
            }
            other => panic!("expected Map, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_numbers() {
        let json: serde_json::Value = serde_json::from_str("[5, 5.5]").unwrap();
        assert_eq!(
            Value::from(json),
            Value::Seq(vec![Value::Int(5), Value::Float(5.5)])
        );
    }
}
