use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde_json::{Map, Value};

use crate::config::ValidatorConfig;
use crate::error::{SchemaError, TypeMismatch};
use crate::format::FormatRegistry;
use crate::keywords::Draft;
use crate::path::{JsonPath, PathSegment};
use crate::report::Violation;
use crate::resolver::{resolve_uri, split_reference, Resolved, Resolver, Scope};

/// Compiles a `pattern` / `patternProperties` regular expression.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, SchemaError> {
    Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// State for one top-level validation call.
///
/// Holds the `$id` base stack, the `$ref` pairs currently being evaluated, both
/// report paths and the recursion depth. Created per call and never shared, so
/// concurrent validations only share the read-only registries behind it.
pub struct ResolutionContext<'s> {
    draft: &'static Draft,
    config: &'s ValidatorConfig,
    formats: &'s FormatRegistry,
    resolver: Resolver<'s>,
    scopes: Vec<Scope<'s>>,
    in_flight: HashSet<(usize, usize)>,
    instance_path: JsonPath,
    schema_path: JsonPath,
    depth: usize,
    patterns: HashMap<&'s str, Regex>,
    unknown_formats: HashSet<&'s str>,
}

impl<'s> ResolutionContext<'s> {
    pub(crate) fn new(
        draft: &'static Draft,
        config: &'s ValidatorConfig,
        formats: &'s FormatRegistry,
        resolver: Resolver<'s>,
        root: Scope<'s>,
    ) -> Self {
        Self {
            draft,
            config,
            formats,
            resolver,
            scopes: vec![root],
            in_flight: HashSet::new(),
            instance_path: JsonPath::new(),
            schema_path: JsonPath::new(),
            depth: 0,
            patterns: HashMap::new(),
            unknown_formats: HashSet::new(),
        }
    }

    /// Evaluates `schema` against `instance` at the current paths.
    ///
    /// Every keyword of an object schema runs; violations from all of them are
    /// returned together.
    pub fn evaluate(&mut self, schema: &'s Value, instance: &Value) -> Result<Vec<Violation>, SchemaError> {
        if self.depth >= self.config.max_depth {
            return Err(SchemaError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let outcome = self.evaluate_node(schema, instance);
        self.depth -= 1;
        outcome
    }

    fn evaluate_node(&mut self, schema: &'s Value, instance: &Value) -> Result<Vec<Violation>, SchemaError> {
        let map = match schema {
            Value::Bool(true) => return Ok(Vec::new()),
            Value::Bool(false) => return Ok(vec![self.violation("schema is always false".to_string())]),
            Value::Object(map) => map,
            _ => return Err(self.schema_error("schema must be an object or a boolean")),
        };

        let pushed = self.push_id_scope(schema, map)?;
        let outcome = self.apply_keywords(map, instance);
        if pushed {
            self.scopes.pop();
        }
        outcome
    }

    fn apply_keywords(&mut self, map: &'s Map<String, Value>, instance: &Value) -> Result<Vec<Violation>, SchemaError> {
        if self.draft.ref_overrides_siblings {
            if let Some(reference) = map.get("$ref") {
                return self.apply_keyword("$ref", map, reference, instance);
            }
        }

        let mut violations = Vec::new();
        for (name, value) in map {
            violations.extend(self.apply_keyword(name, map, value, instance)?);
        }
        Ok(violations)
    }

    fn apply_keyword(
        &mut self,
        name: &'s str,
        map: &'s Map<String, Value>,
        value: &'s Value,
        instance: &Value,
    ) -> Result<Vec<Violation>, SchemaError> {
        let Some(keyword) = self.draft.lookup(name) else {
            return Ok(Vec::new());
        };
        tracing::trace!(keyword = name, instance_path = %self.instance_path, "applying keyword");
        // A followed `$ref` is transparent: the target's keywords extend the
        // referring schema's path directly.
        if name == "$ref" {
            return keyword(self, map, value, instance);
        }
        self.schema_path.push(name);
        let outcome = keyword(self, map, value, instance);
        self.schema_path.pop();
        outcome
    }

    fn push_id_scope(&mut self, schema: &'s Value, map: &'s Map<String, Value>) -> Result<bool, SchemaError> {
        let Some(id) = map.get("$id") else {
            return Ok(false);
        };
        let id = id
            .as_str()
            .ok_or_else(|| self.schema_error("\"$id\" must be a string"))?;
        let (uri_part, _) = split_reference(id);
        if uri_part.is_empty() {
            return Ok(false);
        }
        let base = resolve_uri(self.scope().base.as_deref(), uri_part);
        self.scopes.push(Scope {
            base: Some(base),
            document: schema,
        });
        Ok(true)
    }

    /// Evaluates a subschema with the paths extended by the given segments.
    pub fn descend(
        &mut self,
        schema: &'s Value,
        instance: &Value,
        schema_segment: Option<PathSegment>,
        instance_segment: Option<PathSegment>,
    ) -> Result<Vec<Violation>, SchemaError> {
        let schema_pushed = schema_segment.map(|s| self.schema_path.push(s)).is_some();
        let instance_pushed = instance_segment.map(|s| self.instance_path.push(s)).is_some();
        let outcome = self.evaluate(schema, instance);
        if instance_pushed {
            self.instance_path.pop();
        }
        if schema_pushed {
            self.schema_path.pop();
        }
        outcome
    }

    /// Evaluates the subschema of a sibling keyword, reporting it under that
    /// keyword instead of the one currently ending the schema path.
    pub fn descend_sibling(
        &mut self,
        keyword: &'static str,
        schema: &'s Value,
        instance: &Value,
    ) -> Result<Vec<Violation>, SchemaError> {
        let current = self.schema_path.pop();
        self.schema_path.push(keyword);
        let outcome = self.evaluate(schema, instance);
        self.schema_path.pop();
        if let Some(segment) = current {
            self.schema_path.push(segment);
        }
        outcome
    }

    /// Trial evaluation used as a predicate; violations are discarded.
    pub fn is_valid(&mut self, schema: &'s Value, instance: &Value) -> Result<bool, SchemaError> {
        Ok(self.evaluate(schema, instance)?.is_empty())
    }

    /// Follows a `$ref`, evaluating its target in the target's scope.
    ///
    /// A (target, instance) pair already being evaluated higher up the stack is
    /// a cycle and passes vacuously.
    pub(crate) fn follow_reference(&mut self, reference: &str, instance: &Value) -> Result<Vec<Violation>, SchemaError> {
        let Resolved { schema, scope } = self.resolver.resolve(self.scope(), reference)?;

        let pair = (schema as *const Value as usize, instance as *const Value as usize);
        if !self.in_flight.insert(pair) {
            tracing::debug!(reference, instance_path = %self.instance_path, "reference cycle; treating as valid");
            return Ok(Vec::new());
        }
        tracing::debug!(reference, base = ?scope.base, "following reference");

        self.scopes.push(scope);
        let outcome = self.evaluate(schema, instance);
        self.scopes.pop();
        self.in_flight.remove(&pair);
        outcome
    }

    fn scope(&self) -> &Scope<'s> {
        // The root scope is pushed at construction and never popped.
        &self.scopes[self.scopes.len() - 1]
    }

    pub fn violation(&self, message: String) -> Violation {
        Violation {
            message,
            instance_path: self.instance_path.clone(),
            schema_path: self.schema_path.clone(),
        }
    }

    pub fn schema_error(&self, reason: impl Into<String>) -> SchemaError {
        SchemaError::malformed(&self.schema_path, reason)
    }

    /// Converts an accessor failure on a keyword value into a `SchemaError`.
    pub fn shape<T>(&self, keyword: &str, result: Result<T, TypeMismatch>) -> Result<T, SchemaError> {
        result.map_err(|e| self.schema_error(format!("\"{keyword}\" has the wrong shape: {e}")))
    }

    pub fn object_of(&self, keyword: &str, value: &'s Value) -> Result<&'s Map<String, Value>, SchemaError> {
        self.shape(keyword, crate::value::as_object(value))
    }

    pub fn array_of(&self, keyword: &str, value: &'s Value) -> Result<&'s Vec<Value>, SchemaError> {
        self.shape(keyword, crate::value::as_array(value))
    }

    /// Compiled regex for `pattern`, cached for the rest of the call.
    pub fn regex(&mut self, pattern: &'s str) -> Result<&Regex, SchemaError> {
        if !self.patterns.contains_key(pattern) {
            let compiled = compile_pattern(pattern)?;
            self.patterns.insert(pattern, compiled);
        }
        Ok(&self.patterns[pattern])
    }

    pub fn formats_asserted(&self) -> bool {
        self.config.assert_formats
    }

    pub fn formats(&self) -> &'s FormatRegistry {
        self.formats
    }

    /// Logs an unknown format name the first time it is seen in this call.
    pub fn note_unknown_format(&mut self, name: &'s str) {
        if self.unknown_formats.insert(name) {
            tracing::warn!(format = name, "unknown format; treating as annotation");
        }
    }
}
