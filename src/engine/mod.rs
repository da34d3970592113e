//! Validation engine: walks a schema and an instance in lockstep.
//!
//! [`Validator`] checks the schema once and can then validate any number of
//! instances; each call gets a fresh [`ResolutionContext`].

mod context;

pub use context::ResolutionContext;
pub(crate) use context::compile_pattern;

use serde_json::Value;

use crate::config::ValidatorConfig;
use crate::error::SchemaError;
use crate::format::FormatRegistry;
use crate::keywords::{Draft, DRAFT7};
use crate::registry::SchemaRegistry;
use crate::report::{self, ValidationResult};
use crate::resolver::{Resolver, Scope};
use crate::wellformed;

/// A checked schema, ready to validate instances.
#[derive(Debug, Clone)]
pub struct Validator<'s> {
    schema: &'s Value,
    draft: &'static Draft,
    config: ValidatorConfig,
    formats: FormatRegistry,
    base_uri: Option<String>,
}

impl<'s> Validator<'s> {
    /// Draft-7 validator with default options and the Draft-7 formats.
    pub fn new(schema: &'s Value) -> Result<Self, SchemaError> {
        Self::with_options(schema, ValidatorConfig::default(), FormatRegistry::draft7())
    }

    /// Fails with `SchemaError` when `schema` is structurally malformed or
    /// nested deeper than `config.max_depth`.
    pub fn with_options(
        schema: &'s Value,
        config: ValidatorConfig,
        formats: FormatRegistry,
    ) -> Result<Self, SchemaError> {
        wellformed::check_with_depth(schema, config.max_depth)?;
        Ok(Self {
            schema,
            draft: &DRAFT7,
            config,
            formats,
            base_uri: None,
        })
    }

    /// URI the root schema was retrieved from; relative `$ref`s resolve against it.
    pub fn with_base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    pub fn schema(&self) -> &'s Value {
        self.schema
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates `instance`, collecting every violation.
    ///
    /// `registry` supplies the targets of `$ref`s outside the root document.
    pub fn validate(&self, instance: &Value, registry: &SchemaRegistry) -> Result<ValidationResult, SchemaError> {
        let resolver = Resolver::new(registry, self.schema, self.base_uri.as_deref(), self.config.max_depth)?;
        let root = Scope {
            base: self.base_uri.clone(),
            document: self.schema,
        };
        let mut ctx = ResolutionContext::new(self.draft, &self.config, &self.formats, resolver, root);
        let violations = ctx.evaluate(self.schema, instance)?;
        tracing::debug!(draft = self.draft.name, violations = violations.len(), "validation finished");
        Ok(report::build(violations))
    }

    pub fn is_valid(&self, instance: &Value, registry: &SchemaRegistry) -> Result<bool, SchemaError> {
        Ok(self.validate(instance, registry)?.valid)
    }
}
