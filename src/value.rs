//! Draft-7 views over the generic `serde_json::Value` tree.
//!
//! Schemas and instances share the same representation; this module adds the
//! kind tests, typed accessors and the numeric-aware equality that JSON Schema
//! keywords are defined in terms of.

use std::cmp::Ordering;
use std::fmt::Write as _;

use serde_json::{Map, Number, Value};

use crate::error::TypeMismatch;

/// The JSON kind of a value, as named by the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

pub fn kind_of(value: &Value) -> Kind {
    match value {
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Boolean,
        Value::Number(_) => Kind::Number,
        Value::String(_) => Kind::String,
        Value::Array(_) => Kind::Array,
        Value::Object(_) => Kind::Object,
    }
}

/// True for numbers with no fractional part, including `1.0`.
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => number_is_integer(n),
        _ => false,
    }
}

fn number_is_integer(n: &Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    n.as_f64().map(|f| f.is_finite() && f.fract() == 0.0).unwrap_or(false)
}

/// Whether `value` satisfies the Draft-7 primitive type `name`.
///
/// Returns `None` for names that are not Draft-7 types.
pub fn matches_type(value: &Value, name: &str) -> Option<bool> {
    let matched = match name {
        "null" => value.is_null(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => is_integer(value),
        _ => return None,
    };
    Some(matched)
}

fn mismatch(expected: &'static str, value: &Value) -> TypeMismatch {
    TypeMismatch {
        expected,
        found: kind_of(value).name(),
    }
}

pub fn as_number(value: &Value) -> Result<f64, TypeMismatch> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| mismatch("number", value)),
        _ => Err(mismatch("number", value)),
    }
}

pub fn as_string(value: &Value) -> Result<&str, TypeMismatch> {
    value.as_str().ok_or_else(|| mismatch("string", value))
}

pub fn as_array(value: &Value) -> Result<&Vec<Value>, TypeMismatch> {
    value.as_array().ok_or_else(|| mismatch("array", value))
}

pub fn as_object(value: &Value) -> Result<&Map<String, Value>, TypeMismatch> {
    value.as_object().ok_or_else(|| mismatch("object", value))
}

/// Reads a non-negative integer such as `minLength` or `maxItems`.
///
/// `2.0` is accepted, matching the integer-valued number rule.
pub fn as_count(value: &Value) -> Result<u64, TypeMismatch> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Ok(u);
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
                _ => Err(mismatch("non-negative integer", value)),
            }
        }
        _ => Err(mismatch("non-negative integer", value)),
    }
}

/// Compares two JSON numbers by value.
///
/// Integer values compare exactly, including integral floats, so
/// `9007199254740993` and `9007199254740992.0` differ. Everything else
/// compares as `f64`.
pub fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (exact_integer(a), exact_integer(b)) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

// 2^127; every integral f64 below it converts to i128 without loss.
const I128_FLOAT_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

fn exact_integer(n: &Number) -> Option<i128> {
    if let Some(i) = n.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(i128::from(u));
    }
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < I128_FLOAT_BOUND)
        .map(|f| f as i128)
}

/// Structural equality with JSON Schema numeric semantics.
///
/// `1` equals `1.0`, object key order is ignored, array order is not, and
/// booleans never equal numbers.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Some(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| deep_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, l)| y.get(key).map(|r| deep_equal(l, r)).unwrap_or(false))
        }
        _ => false,
    }
}

/// A string key such that `deep_equal(a, b)` implies equal keys.
///
/// Object keys are sorted and integer-valued numbers are printed without a
/// fractional part, so `{"b":1,"a":2.0}` and `{"a":2,"b":1.0}` collide.
pub fn canonical_string(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            if let Some(i) = exact_integer(n) {
                let _ = write!(out, "{i}");
            } else if let Some(f) = n.as_f64() {
                let _ = write!(out, "{f:?}");
            }
        }
        Value::String(s) => out.push_str(&Value::String(s.clone()).to_string()),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
    }
}

/// Compact JSON rendering used inside violation messages.
pub fn render(value: &Value) -> String {
    value.to_string()
}
