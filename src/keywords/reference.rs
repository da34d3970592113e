use serde_json::{Map, Value};

use crate::engine::ResolutionContext;
use crate::error::SchemaError;
use crate::report::Violation;
use crate::value::as_string;

pub(crate) fn reference<'s>(
    ctx: &mut ResolutionContext<'s>,
    _schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let reference = ctx.shape("$ref", as_string(value))?;
    ctx.follow_reference(reference, instance)
}
