use crate::path::JsonPath;

/// Fatal failure: the schema itself cannot be used.
///
/// Never mixed into the violation list. Any of these aborts the whole
/// validation call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("{reason} at schema path {schema_path}")]
    Malformed { schema_path: JsonPath, reason: String },

    #[error("unresolvable reference {reference:?}: {reason}")]
    UnresolvableReference { reference: String, reason: String },

    #[error("invalid regular expression {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("schema nesting exceeds the depth limit of {limit}")]
    DepthExceeded { limit: usize },
}

impl SchemaError {
    pub fn malformed(schema_path: &JsonPath, reason: impl Into<String>) -> Self {
        Self::Malformed {
            schema_path: schema_path.clone(),
            reason: reason.into(),
        }
    }

    pub fn unresolvable(reference: &str, reason: impl Into<String>) -> Self {
        Self::UnresolvableReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

/// A value accessor was applied to a value of another kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found}")]
pub struct TypeMismatch {
    pub expected: &'static str,
    pub found: &'static str,
}
