//! String length (in code points) and `pattern`; non-strings pass.

use serde_json::{Map, Value};

use super::quoted;
use crate::engine::ResolutionContext;
use crate::error::SchemaError;
use crate::report::Violation;
use crate::value::{as_count, as_string, render};

fn length_bound<'s>(
    ctx: &ResolutionContext<'s>,
    keyword: &str,
    value: &'s Value,
    instance: &Value,
    too_short: bool,
) -> Result<Vec<Violation>, SchemaError> {
    let limit = ctx.shape(keyword, as_count(value))?;
    let Value::String(s) = instance else {
        return Ok(Vec::new());
    };
    let length = s.chars().count() as u64;
    let failed = if too_short { length < limit } else { length > limit };
    if !failed {
        return Ok(Vec::new());
    }
    let verdict = if too_short { "too short" } else { "too long" };
    Ok(vec![ctx.violation(format!("{} is {verdict}", render(instance)))])
}

pub(crate) fn min_length<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    length_bound(ctx, "minLength", value, instance, true)
}

pub(crate) fn max_length<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    length_bound(ctx, "maxLength", value, instance, false)
}

pub(crate) fn pattern<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let pattern = ctx.shape("pattern", as_string(value))?;
    let Value::String(s) = instance else {
        return Ok(Vec::new());
    };
    if ctx.regex(pattern)?.is_match(s) {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.violation(format!(
        "{} does not match {}",
        render(instance),
        quoted(pattern)
    ))])
}
