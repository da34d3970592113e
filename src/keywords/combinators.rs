//! `allOf`, `anyOf`, `oneOf` and `not`.
//!
//! Branches are evaluated by separate recursive calls. `allOf` passes branch
//! violations through; the others only decide pass/fail from their branches and
//! report one summary violation at the combinator itself.

use serde_json::{Map, Value};

use crate::engine::ResolutionContext;
use crate::error::SchemaError;
use crate::report::Violation;
use crate::value::render;

pub(crate) fn all_of<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let branches = ctx.array_of("allOf", value)?;
    let mut violations = Vec::new();
    for (index, branch) in branches.iter().enumerate() {
        violations.extend(ctx.descend(branch, instance, Some(index.into()), None)?);
    }
    Ok(violations)
}

pub(crate) fn any_of<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let branches = ctx.array_of("anyOf", value)?;
    for branch in branches {
        if ctx.is_valid(branch, instance)? {
            return Ok(Vec::new());
        }
    }
    Ok(vec![ctx.violation(format!(
        "{} is not valid under any of the given schemas",
        render(instance)
    ))])
}

pub(crate) fn one_of<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let branches = ctx.array_of("oneOf", value)?;
    let mut matched = 0usize;
    for branch in branches {
        if ctx.is_valid(branch, instance)? {
            matched += 1;
        }
    }
    let message = match matched {
        1 => return Ok(Vec::new()),
        0 => format!("{} is not valid under any of the given schemas", render(instance)),
        n => format!("{n} schemas matched, expected exactly 1"),
    };
    Ok(vec![ctx.violation(message)])
}

pub(crate) fn not<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    if !ctx.is_valid(value, instance)? {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.violation(format!(
        "{} should not be valid under {}",
        render(instance),
        render(value)
    ))])
}
