//! Structural sanity of a schema document against the Draft-7 keyword shapes.
//!
//! Runs before any instance is looked at. A schema that passes here will not
//! raise `SchemaError::Malformed` during evaluation; reference and depth errors
//! can still occur since they depend on the instance and the registry.
//!
//! Schema nesting is bounded by the same limit as evaluation, so a document
//! nested too deeply fails with `SchemaError::DepthExceeded` instead of
//! exhausting the stack.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::config::DEFAULT_MAX_DEPTH;
use crate::engine::compile_pattern;
use crate::error::SchemaError;
use crate::path::JsonPath;
use crate::value::{as_count, matches_type};

pub fn check(schema: &Value) -> Result<(), SchemaError> {
    check_with_depth(schema, DEFAULT_MAX_DEPTH)
}

/// Like [`check`], refusing schemas nested more than `max_depth` levels.
pub fn check_with_depth(schema: &Value, max_depth: usize) -> Result<(), SchemaError> {
    let mut walk = Walk {
        path: JsonPath::new(),
        depth: 0,
        max_depth,
    };
    check_schema(schema, &mut walk)
}

struct Walk {
    path: JsonPath,
    depth: usize,
    max_depth: usize,
}

fn check_schema(schema: &Value, walk: &mut Walk) -> Result<(), SchemaError> {
    if walk.depth >= walk.max_depth {
        return Err(SchemaError::DepthExceeded { limit: walk.max_depth });
    }
    walk.depth += 1;
    let outcome = check_schema_node(schema, walk);
    walk.depth -= 1;
    outcome
}

fn check_schema_node(schema: &Value, walk: &mut Walk) -> Result<(), SchemaError> {
    let map = match schema {
        Value::Bool(_) => return Ok(()),
        Value::Object(map) => map,
        _ => return Err(SchemaError::malformed(&walk.path, "schema must be an object or a boolean")),
    };

    for (keyword, value) in map {
        walk.path.push(keyword.as_str());
        check_keyword(keyword, value, walk)?;
        walk.path.pop();
    }
    Ok(())
}

fn check_keyword(keyword: &str, value: &Value, walk: &mut Walk) -> Result<(), SchemaError> {
    let path = &walk.path;
    match keyword {
        "$ref" | "$id" | "$schema" | "$comment" | "title" | "description" | "format"
        | "contentMediaType" | "contentEncoding" => expect(value.is_string(), keyword, "a string", path),

        "type" => check_type(value, path),

        "enum" => expect(value.is_array(), keyword, "an array", path),

        "multipleOf" => {
            let positive = value.as_f64().map(|m| m > 0.0).unwrap_or(false);
            expect(positive, keyword, "a number greater than 0", path)
        }

        "minimum" | "maximum" | "exclusiveMinimum" | "exclusiveMaximum" => {
            expect(value.is_number(), keyword, "a number", path)
        }

        "minLength" | "maxLength" | "minItems" | "maxItems" | "minProperties" | "maxProperties" => {
            expect(as_count(value).is_ok(), keyword, "a non-negative integer", path)
        }

        "pattern" => {
            let pattern = value
                .as_str()
                .ok_or_else(|| SchemaError::malformed(path, "\"pattern\" must be a string"))?;
            compile_pattern(pattern).map(drop)
        }

        "uniqueItems" | "readOnly" | "writeOnly" => expect(value.is_boolean(), keyword, "a boolean", path),

        "required" => check_string_set(value, keyword, path),

        "items" => match value {
            Value::Array(schemas) => check_schema_list(schemas, walk),
            _ => check_schema(value, walk),
        },

        "additionalItems" | "contains" | "additionalProperties" | "propertyNames" | "not" | "if"
        | "then" | "else" => check_schema(value, walk),

        "properties" | "definitions" => {
            let map = object(value, keyword, path)?;
            check_schema_map(map, walk)
        }

        "patternProperties" => {
            let map = object(value, keyword, path)?;
            for pattern in map.keys() {
                compile_pattern(pattern)?;
            }
            check_schema_map(map, walk)
        }

        "dependencies" => {
            let map = object(value, keyword, path)?;
            for (property, dependency) in map {
                walk.path.push(property.as_str());
                match dependency {
                    Value::Array(_) => check_string_set(dependency, keyword, &walk.path)?,
                    _ => check_schema(dependency, walk)?,
                }
                walk.path.pop();
            }
            Ok(())
        }

        "allOf" | "anyOf" | "oneOf" => match value {
            Value::Array(schemas) if !schemas.is_empty() => check_schema_list(schemas, walk),
            _ => Err(SchemaError::malformed(
                path,
                format!("\"{keyword}\" must be a non-empty array of schemas"),
            )),
        },

        _ => Ok(()),
    }
}

fn expect(ok: bool, keyword: &str, shape: &str, path: &JsonPath) -> Result<(), SchemaError> {
    if ok {
        Ok(())
    } else {
        Err(SchemaError::malformed(path, format!("\"{keyword}\" must be {shape}")))
    }
}

fn object<'a>(value: &'a Value, keyword: &str, path: &JsonPath) -> Result<&'a Map<String, Value>, SchemaError> {
    value
        .as_object()
        .ok_or_else(|| SchemaError::malformed(path, format!("\"{keyword}\" must be an object")))
}

fn check_type(value: &Value, path: &JsonPath) -> Result<(), SchemaError> {
    let known = |name: &Value| name.as_str().and_then(|n| matches_type(&Value::Null, n)).is_some();
    match value {
        Value::String(_) if known(value) => Ok(()),
        Value::Array(names) if names.iter().all(known) => {
            let mut seen = HashSet::new();
            if names.iter().all(|n| seen.insert(n.as_str())) {
                Ok(())
            } else {
                Err(SchemaError::malformed(path, "\"type\" must not repeat a type name"))
            }
        }
        _ => Err(SchemaError::malformed(
            path,
            format!("\"type\" must name Draft-7 types, got {value}"),
        )),
    }
}

fn check_string_set(value: &Value, keyword: &str, path: &JsonPath) -> Result<(), SchemaError> {
    let shape_error = || SchemaError::malformed(path, format!("\"{keyword}\" must be an array of unique strings"));
    let items = value.as_array().ok_or_else(shape_error)?;
    let mut seen = HashSet::new();
    for item in items {
        let name = item.as_str().ok_or_else(shape_error)?;
        if !seen.insert(name) {
            return Err(shape_error());
        }
    }
    Ok(())
}

fn check_schema_list(schemas: &[Value], walk: &mut Walk) -> Result<(), SchemaError> {
    for (index, schema) in schemas.iter().enumerate() {
        walk.path.push(index);
        check_schema(schema, walk)?;
        walk.path.pop();
    }
    Ok(())
}

fn check_schema_map(map: &Map<String, Value>, walk: &mut Walk) -> Result<(), SchemaError> {
    for (name, schema) in map {
        walk.path.push(name.as_str());
        check_schema(schema, walk)?;
        walk.path.pop();
    }
    Ok(())
}
