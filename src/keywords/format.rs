use serde_json::{Map, Value};

use super::quoted;
use crate::engine::ResolutionContext;
use crate::error::SchemaError;
use crate::report::Violation;
use crate::value::{as_string, render};

pub(crate) fn format<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let name = ctx.shape("format", as_string(value))?;
    if !ctx.formats_asserted() {
        return Ok(Vec::new());
    }
    let Value::String(s) = instance else {
        return Ok(Vec::new());
    };
    let Some(checker) = ctx.formats().get(name) else {
        ctx.note_unknown_format(name);
        return Ok(Vec::new());
    };
    if checker(s.as_str()) {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.violation(format!("{} is not a {}", render(instance), quoted(name)))])
}
