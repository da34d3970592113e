//! Range and divisibility checks; non-numbers pass.

use std::cmp::Ordering;

use serde_json::{Map, Number, Value};

use crate::engine::ResolutionContext;
use crate::error::SchemaError;
use crate::report::Violation;
use crate::value::{compare_numbers, render};

fn limit<'s>(ctx: &ResolutionContext<'s>, keyword: &str, value: &'s Value) -> Result<&'s Number, SchemaError> {
    match value {
        Value::Number(n) => Ok(n),
        _ => Err(ctx.schema_error(format!("\"{keyword}\" must be a number"))),
    }
}

/// Fails when the instance compares to the limit with any of `failing`.
fn bound<'s>(
    ctx: &ResolutionContext<'s>,
    keyword: &str,
    value: &'s Value,
    instance: &Value,
    failing: &[Ordering],
    relation: &str,
) -> Result<Vec<Violation>, SchemaError> {
    let limit = limit(ctx, keyword, value)?;
    let Value::Number(n) = instance else {
        return Ok(Vec::new());
    };
    match compare_numbers(n, limit) {
        Some(ordering) if failing.contains(&ordering) => Ok(vec![ctx.violation(format!(
            "{} is {relation} {}",
            render(instance),
            render(value)
        ))]),
        _ => Ok(Vec::new()),
    }
}

pub(crate) fn minimum<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    bound(ctx, "minimum", value, instance, &[Ordering::Less], "less than the minimum of")
}

pub(crate) fn maximum<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    bound(ctx, "maximum", value, instance, &[Ordering::Greater], "greater than the maximum of")
}

pub(crate) fn exclusive_minimum<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    bound(
        ctx,
        "exclusiveMinimum",
        value,
        instance,
        &[Ordering::Less, Ordering::Equal],
        "less than or equal to the minimum of",
    )
}

pub(crate) fn exclusive_maximum<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    bound(
        ctx,
        "exclusiveMaximum",
        value,
        instance,
        &[Ordering::Greater, Ordering::Equal],
        "greater than or equal to the maximum of",
    )
}

pub(crate) fn multiple_of<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let divisor = limit(ctx, "multipleOf", value)?;
    let Value::Number(n) = instance else {
        return Ok(Vec::new());
    };
    if is_multiple(n, divisor) {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.violation(format!(
        "{} is not a multiple of {}",
        render(instance),
        render(value)
    ))])
}

fn is_multiple(n: &Number, divisor: &Number) -> bool {
    if let (Some(x), Some(m)) = (n.as_i64(), divisor.as_i64()) {
        return m != 0 && x.checked_rem(m).map_or(true, |r| r == 0);
    }
    if let (Some(x), Some(m)) = (n.as_u64(), divisor.as_u64()) {
        return m != 0 && x % m == 0;
    }
    let (Some(x), Some(m)) = (n.as_f64(), divisor.as_f64()) else {
        return false;
    };
    if m == 0.0 {
        return false;
    }
    let quotient = x / m;
    if quotient.is_finite() {
        quotient.fract() == 0.0
    } else {
        x % m == 0.0
    }
}
