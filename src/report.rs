use serde::Serialize;

use crate::error::SchemaError;
use crate::path::JsonPath;

// ---------------------------------------------------------------------------
// Engine result layer
// ---------------------------------------------------------------------------

/// One failure of an instance node against a schema constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub message: String,
    /// Location in the instance; serialized as `path`.
    #[serde(rename = "path")]
    pub instance_path: JsonPath,
    /// Keywords (and the indices/names selecting subschemas) traversed to the check.
    pub schema_path: JsonPath,
}

/// Outcome of a validation that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Violation>,
}

/// Orders violations by instance path and derives validity.
///
/// The sort is stable: violations at the same instance path keep the order in
/// which the schema's keywords produced them.
pub fn build(mut violations: Vec<Violation>) -> ValidationResult {
    violations.sort_by(|a, b| a.instance_path.cmp(&b.instance_path));
    ValidationResult {
        valid: violations.is_empty(),
        errors: violations,
    }
}

// ---------------------------------------------------------------------------
// CLI output layer
// ---------------------------------------------------------------------------

/// Top-level document printed by the `validate-jsonschema` binary.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    Completed(ValidationResult),
    Failed(FailureReport),
}

/// `{"error": ...}` with an optional `trace` for unexpected failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl Report {
    pub fn usage(program: &str) -> Self {
        Self::failure(format!("Usage: {program} <schema.json> <data.json>"))
    }

    pub fn unreadable(detail: impl std::fmt::Display) -> Self {
        Self::failure(format!("Failed to read files: {detail}"))
    }

    pub fn unexpected(detail: impl std::fmt::Display, trace: impl Into<String>) -> Self {
        Self::Failed(FailureReport {
            error: format!("Unexpected error: {detail}"),
            trace: Some(trace.into()),
        })
    }

    fn failure(error: String) -> Self {
        Self::Failed(FailureReport { error, trace: None })
    }

    /// Process exit code: 0 whenever validation itself completed.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed(_) => 0,
            Self::Failed(_) => 1,
        }
    }
}

impl From<ValidationResult> for Report {
    fn from(result: ValidationResult) -> Self {
        Self::Completed(result)
    }
}

/// A refused schema: `{"error": "Invalid schema: ..."}`.
impl From<SchemaError> for Report {
    fn from(err: SchemaError) -> Self {
        Self::failure(format!("Invalid schema: {err}"))
    }
}
