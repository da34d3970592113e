use serde_json::{Map, Value};

use super::quoted;
use crate::engine::ResolutionContext;
use crate::error::SchemaError;
use crate::report::Violation;
use crate::value::{deep_equal, matches_type, render};

pub(crate) fn type_<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let names: Vec<&str> = match value {
        Value::String(name) => vec![name.as_str()],
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| ctx.schema_error("\"type\" entries must be strings")))
            .collect::<Result<_, _>>()?,
        _ => return Err(ctx.schema_error("\"type\" must be a string or an array of strings")),
    };

    let mut matched = false;
    for name in &names {
        match matches_type(instance, name) {
            Some(true) => matched = true,
            Some(false) => {}
            None => return Err(ctx.schema_error(format!("unknown type {}", quoted(name)))),
        }
    }
    if matched {
        return Ok(Vec::new());
    }

    let expected: Vec<String> = names.iter().map(|name| quoted(name)).collect();
    Ok(vec![ctx.violation(format!(
        "{} is not of type {}",
        render(instance),
        expected.join(", ")
    ))])
}

pub(crate) fn enum_<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let options = ctx.array_of("enum", value)?;
    if options.iter().any(|option| deep_equal(option, instance)) {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.violation(format!(
        "{} is not one of {}",
        render(instance),
        render(value)
    ))])
}

pub(crate) fn const_<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    if deep_equal(value, instance) {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.violation(format!("{} was expected", render(value)))])
}
