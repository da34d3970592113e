//! Object keywords; non-objects pass.

use serde_json::{Map, Value};

use super::quoted;
use crate::engine::ResolutionContext;
use crate::error::SchemaError;
use crate::report::Violation;
use crate::value::{as_count, render};

pub(crate) fn properties<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let declared = ctx.object_of("properties", value)?;
    let Value::Object(members) = instance else {
        return Ok(Vec::new());
    };

    let mut violations = Vec::new();
    for (name, schema) in declared {
        if let Some(member) = members.get(name) {
            violations.extend(ctx.descend(schema, member, Some(name.as_str().into()), Some(name.as_str().into()))?);
        }
    }
    Ok(violations)
}

pub(crate) fn pattern_properties<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let patterns = ctx.object_of("patternProperties", value)?;
    let Value::Object(members) = instance else {
        return Ok(Vec::new());
    };

    let mut violations = Vec::new();
    for (pattern, schema) in patterns {
        let matching: Vec<(&String, &Value)> = {
            let regex = ctx.regex(pattern)?;
            members.iter().filter(|(name, _)| regex.is_match(name.as_str())).collect()
        };
        for (name, member) in matching {
            violations.extend(ctx.descend(schema, member, Some(pattern.as_str().into()), Some(name.as_str().into()))?);
        }
    }
    Ok(violations)
}

/// Applies to members matched by neither `properties` nor `patternProperties`.
pub(crate) fn additional_properties<'s>(
    ctx: &mut ResolutionContext<'s>,
    schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let Value::Object(members) = instance else {
        return Ok(Vec::new());
    };
    let declared = match schema.get("properties") {
        Some(properties) => Some(ctx.object_of("properties", properties)?),
        None => None,
    };
    let patterns: Vec<&'s str> = match schema.get("patternProperties") {
        Some(patterns) => ctx.object_of("patternProperties", patterns)?.keys().map(String::as_str).collect(),
        None => Vec::new(),
    };

    let mut extras: Vec<(&String, &Value)> = Vec::new();
    for (name, member) in members {
        if declared.map_or(false, |d| d.contains_key(name)) {
            continue;
        }
        let mut covered = false;
        for pattern in patterns.iter().copied() {
            if ctx.regex(pattern)?.is_match(name) {
                covered = true;
                break;
            }
        }
        if !covered {
            extras.push((name, member));
        }
    }
    if extras.is_empty() {
        return Ok(Vec::new());
    }

    if let Value::Bool(false) = value {
        let message = if patterns.is_empty() {
            let names: Vec<String> = extras.iter().map(|(name, _)| quoted(name)).collect();
            let verb = if names.len() == 1 { "was" } else { "were" };
            format!("Additional properties are not allowed ({} {verb} unexpected)", names.join(", "))
        } else {
            let mut names: Vec<String> = extras.iter().map(|(name, _)| quoted(name)).collect();
            names.sort();
            let verb = if names.len() == 1 { "does" } else { "do" };
            let mut regexes: Vec<String> = patterns.iter().map(|p| quoted(p)).collect();
            regexes.sort();
            format!(
                "{} {verb} not match any of the regexes: {}",
                names.join(", "),
                regexes.join(", ")
            )
        };
        return Ok(vec![ctx.violation(message)]);
    }

    let mut violations = Vec::new();
    for (name, member) in extras {
        violations.extend(ctx.descend(value, member, None, Some(name.as_str().into()))?);
    }
    Ok(violations)
}

pub(crate) fn required<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let names = ctx.array_of("required", value)?;
    let Value::Object(members) = instance else {
        return Ok(Vec::new());
    };

    let mut violations = Vec::new();
    for name in names {
        let name = name
            .as_str()
            .ok_or_else(|| ctx.schema_error("\"required\" entries must be strings"))?;
        if !members.contains_key(name) {
            violations.push(ctx.violation(format!("{} is a required property", quoted(name))));
        }
    }
    Ok(violations)
}

fn count_bound<'s>(
    ctx: &ResolutionContext<'s>,
    keyword: &str,
    value: &'s Value,
    instance: &Value,
    too_few: bool,
) -> Result<Vec<Violation>, SchemaError> {
    let limit = ctx.shape(keyword, as_count(value))?;
    let Value::Object(members) = instance else {
        return Ok(Vec::new());
    };
    let count = members.len() as u64;
    if too_few && count < limit {
        return Ok(vec![ctx.violation(format!("{} does not have enough properties", render(instance)))]);
    }
    if !too_few && count > limit {
        return Ok(vec![ctx.violation(format!("{} has too many properties", render(instance)))]);
    }
    Ok(Vec::new())
}

pub(crate) fn min_properties<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    count_bound(ctx, "minProperties", value, instance, true)
}

pub(crate) fn max_properties<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    count_bound(ctx, "maxProperties", value, instance, false)
}

/// Each member name is validated as a string instance at the object's path.
pub(crate) fn property_names<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let Value::Object(members) = instance else {
        return Ok(Vec::new());
    };

    let mut violations = Vec::new();
    for name in members.keys() {
        let name = Value::String(name.clone());
        violations.extend(ctx.evaluate(value, &name)?);
    }
    Ok(violations)
}

/// Property-triggered requirements: a list of names or a schema.
pub(crate) fn dependencies<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let dependencies = ctx.object_of("dependencies", value)?;
    let Value::Object(members) = instance else {
        return Ok(Vec::new());
    };

    let mut violations = Vec::new();
    for (property, dependency) in dependencies {
        if !members.contains_key(property) {
            continue;
        }
        match dependency {
            Value::Array(names) => {
                for name in names {
                    let name = name
                        .as_str()
                        .ok_or_else(|| ctx.schema_error("\"dependencies\" name lists must hold strings"))?;
                    if !members.contains_key(name) {
                        violations.push(ctx.violation(format!(
                            "{} is a dependency of {}",
                            quoted(name),
                            quoted(property)
                        )));
                    }
                }
            }
            schema => violations.extend(ctx.descend(schema, instance, Some(property.as_str().into()), None)?),
        }
    }
    Ok(violations)
}
