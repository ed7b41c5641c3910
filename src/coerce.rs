//! Type coercion policy for placeholder targets.
//!
//! Pure functions of `(value, mode)`: given a placeholder's declared type
//! and a runtime argument, each function either produces the replacement
//! text or reports a mismatch. The scanner attaches the offending query
//! template when it converts a [`Mismatch`] into the public error type.
//!
//! Shape, not storage, is what both modes key on for the numeric targets:
//! the string `"123"` and the integer `123` are both integer-shaped and
//! pass through `?i` unchanged in either mode, while `"123.0"` is
//! float-shaped and only converts under [`Mode::Transform`].

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Governs behavior on placeholder/argument type disagreement.
///
/// Uniform for a whole render call; it cannot vary per placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Reject any argument whose shape does not match the placeholder type.
    Strict,
    /// Convert mismatched scalars to the placeholder type where a
    /// conversion exists; collections are never coerced.
    #[default]
    Transform,
}

/// A rejected coercion: the placeholder's expected type and the
/// argument's (shape-corrected) actual type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mismatch {
    pub expected: &'static str,
    pub actual: &'static str,
}

impl Mismatch {
    fn new(expected: &'static str, value: &Value) -> Self {
        Self {
            expected,
            actual: actual_type_name(value),
        }
    }
}

/// Reported type of a mismatched argument.
///
/// Numeric strings report their numeric shape (`integer` / `double`)
/// rather than `string`, so a strict-mode rejection of `"55.5"` against
/// `?i` reads as a double/integer conflict.
fn actual_type_name(value: &Value) -> &'static str {
    match value {
        Value::Str(_) if value.is_integer_shaped() => "integer",
        Value::Str(_) if value.is_float_shaped() => "double",
        other => other.type_name(),
    }
}

/// Coerce toward the string target (`?s` / `?S`, and `?as` elements).
///
/// Strings pass through. Under Transform, booleans become `"1"`/`""`,
/// NULL becomes `""`, and numbers take their canonical string form.
/// Collections are fatal in both modes.
pub(crate) fn string_value(value: &Value, mode: Mode) -> Result<String, Mismatch> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        _ if mode == Mode::Strict => Err(Mismatch::new("string", value)),
        Value::Bool(true) => Ok("1".to_string()),
        Value::Bool(false) => Ok(String::new()),
        Value::Null => Ok(String::new()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Seq(_) | Value::Map(_) => Err(Mismatch::new("string", value)),
    }
}

/// Coerce toward the integer target (`?i`).
///
/// Integer-shaped values pass through unchanged, sign and all. Under
/// Transform, float-shaped values truncate toward zero, NULL becomes `0`,
/// booleans become `0`/`1`.
pub(crate) fn integer_value(value: &Value, mode: Mode) -> Result<String, Mismatch> {
    match value {
        Value::Int(i) => return Ok(i.to_string()),
        Value::Str(s) if value.is_integer_shaped() => return Ok(s.clone()),
        _ => {}
    }

    if mode == Mode::Transform {
        match value {
            Value::Float(f) => return Ok((f.trunc() as i64).to_string()),
            Value::Str(s) if value.is_float_shaped() => {
                let f: f64 = s.parse().map_err(|_| Mismatch::new("integer", value))?;
                return Ok((f.trunc() as i64).to_string());
            }
            Value::Null => return Ok("0".to_string()),
            Value::Bool(b) => return Ok(i64::from(*b).to_string()),
            _ => {}
        }
    }

    Err(Mismatch::new("integer", value))
}

/// Coerce toward the float target (`?d`).
///
/// Symmetric to [`integer_value`]: float-shaped values pass through
/// unchanged, integer-shaped values convert under Transform. The decimal
/// separator in produced text is always `.`; adapting it to a session
/// locale is the caller's concern.
pub(crate) fn float_value(value: &Value, mode: Mode) -> Result<String, Mismatch> {
    match value {
        Value::Float(f) => return Ok(f.to_string()),
        Value::Str(s) if value.is_float_shaped() => return Ok(s.clone()),
        _ => {}
    }

    if mode == Mode::Transform {
        match value {
            Value::Int(i) => return Ok((*i as f64).to_string()),
            Value::Str(s) if value.is_integer_shaped() => {
                let f: f64 = s.parse().map_err(|_| Mismatch::new("double", value))?;
                return Ok(f.to_string());
            }
            Value::Null => return Ok("0".to_string()),
            Value::Bool(b) => return Ok(i64::from(*b).to_string()),
            _ => {}
        }
    }

    Err(Mismatch::new("double", value))
}

/// Coerce toward the NULL target (`?n`).
///
/// Transform always yields `NULL` regardless of the argument; Strict
/// accepts only a literal NULL argument.
pub(crate) fn null_value(value: &Value, mode: Mode) -> Result<String, Mismatch> {
    if mode == Mode::Strict && !matches!(value, Value::Null) {
        return Err(Mismatch::new("NULL", value));
    }
    Ok("NULL".to_string())
}
