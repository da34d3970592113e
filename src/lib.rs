//! JSON Schema Draft 7 validation with exhaustive error reporting.
//!
//! Validates a parsed JSON instance against a parsed schema and reports every
//! violation with its instance path and schema path, sorted by instance path.
//! A malformed schema is a distinct [`SchemaError`], never a violation.
//!
//! ```
//! use draft7_validate::{validate, SchemaRegistry};
//! use serde_json::json;
//!
//! let schema = json!({"type": "object", "required": ["age"]});
//! let result = validate(&schema, &json!({}), &SchemaRegistry::new()).unwrap();
//! assert!(!result.valid);
//! assert_eq!(result.errors[0].message, r#""age" is a required property"#);
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod keywords;
pub mod path;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod value;
pub mod wellformed;

pub use config::ValidatorConfig;
pub use engine::Validator;
pub use error::SchemaError;
pub use format::FormatRegistry;
pub use path::{JsonPath, PathSegment};
pub use registry::SchemaRegistry;
pub use report::{ValidationResult, Violation};

use serde_json::Value;

/// Validates `data` against `schema` with default options.
///
/// `registry` must already hold every external document `schema` references.
pub fn validate(schema: &Value, data: &Value, registry: &SchemaRegistry) -> Result<ValidationResult, SchemaError> {
    Validator::new(schema)?.validate(data, registry)
}
