use serde_json::{Map, Value};

use crate::engine::ResolutionContext;
use crate::error::SchemaError;
use crate::report::Violation;

/// `if` is a predicate only; the chosen branch reports under `then` / `else`.
pub(crate) fn if_<'s>(
    ctx: &mut ResolutionContext<'s>,
    schema: &'s Map<String, Value>,
    value: &'s Value,
    instance: &Value,
) -> Result<Vec<Violation>, SchemaError> {
    let (branch, keyword) = if ctx.is_valid(value, instance)? {
        (schema.get("then"), "then")
    } else {
        (schema.get("else"), "else")
    };
    match branch {
        Some(branch) => ctx.descend_sibling(keyword, branch, instance),
        None => Ok(Vec::new()),
    }
}
