//! Array keywords; non-arrays pass.
//!
//! `items` takes either one schema for every element or a tuple of schemas by
//! position. `additionalItems` only applies past the end of a tuple.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::engine::ResolutionContext;
use crate::error::SchemaError;
use crate::report::Violation;
use crate::value::{as_count, canonical_string, render};

pub(crate) fn items<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let Value::Array(elements) = instance else {
        return Ok(Vec::new());
    };

    let mut violations = Vec::new();
    match value {
        Value::Array(tuple) => {
            for (index, (schema, element)) in tuple.iter().zip(elements).enumerate() {
                violations.extend(ctx.descend(schema, element, Some(index.into()), Some(index.into()))?);
            }
        }
        _ => {
            for (index, element) in elements.iter().enumerate() {
                violations.extend(ctx.descend(value, element, None, Some(index.into()))?);
            }
        }
    }
    Ok(violations)
}

pub(crate) fn additional_items<'s>(
    ctx: &mut ResolutionContext<'s>,
    schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let (Value::Array(elements), Some(Value::Array(tuple))) = (instance, schema.get("items")) else {
        return Ok(Vec::new());
    };
    if elements.len() <= tuple.len() {
        return Ok(Vec::new());
    }

    if let Value::Bool(false) = value {
        let extras: Vec<String> = elements[tuple.len()..].iter().map(render).collect();
        let verb = if extras.len() == 1 { "was" } else { "were" };
        return Ok(vec![ctx.violation(format!(
            "Additional items are not allowed ({} {verb} unexpected)",
            extras.join(", ")
        ))]);
    }

    let mut violations = Vec::new();
    for (index, element) in elements.iter().enumerate().skip(tuple.len()) {
        violations.extend(ctx.descend(value, element, None, Some(index.into()))?);
    }
    Ok(violations)
}

fn count_bound<'s>(
    ctx: &ResolutionContext<'s>,
    keyword: &str,
    value: &'s Value,
    instance: &Value,
    too_short: bool,
) -> Result<Vec<Violation>, SchemaError> {
    let limit = ctx.shape(keyword, as_count(value))?;
    let Value::Array(elements) = instance else {
        return Ok(Vec::new());
    };
    let length = elements.len() as u64;
    let failed = if too_short { length < limit } else { length > limit };
    if !failed {
        return Ok(Vec::new());
    }
    let verdict = if too_short { "too short" } else { "too long" };
    Ok(vec![ctx.violation(format!("{} is {verdict}", render(instance)))])
}

pub(crate) fn min_items<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    count_bound(ctx, "minItems", value, instance, true)
}

pub(crate) fn max_items<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    count_bound(ctx, "maxItems", value, instance, false)
}

pub(crate) fn unique_items<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let Value::Bool(enabled) = value else {
        return Err(ctx.schema_error("\"uniqueItems\" must be a boolean"));
    };
    let (true, Value::Array(elements)) = (*enabled, instance) else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::with_capacity(elements.len());
    if elements.iter().all(|element| seen.insert(canonical_string(element))) {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.violation(format!("{} has non-unique elements", render(instance)))])
}

pub(crate) fn contains<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let Value::Array(elements) = instance else {
        return Ok(Vec::new());
    };
    for element in elements {
        if ctx.is_valid(value, element)? {
            return Ok(Vec::new());
        }
    }
    Ok(vec![ctx.violation(format!(
        "{} does not contain items matching the given schema",
        render(instance)
    ))])
}
