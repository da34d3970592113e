//! `$ref` and JSON Pointer resolution.
//!
//! A reference splits into a URI part and a fragment. The URI part selects a
//! document (the current one when empty, otherwise a resource resolved against
//! the active `$id` base); the fragment is then applied as a JSON Pointer
//! (`#/definitions/a`) or as a plain-name anchor (`#node`).

use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use url::Url;

use crate::error::SchemaError;
use crate::registry::SchemaRegistry;

/// The resolution base in effect at one point of a walk.
#[derive(Debug, Clone)]
pub struct Scope<'s> {
    /// Absolute or registry-relative URI of the enclosing resource, if known.
    pub base: Option<String>,
    /// The resource fragment-only references are resolved against.
    pub document: &'s Value,
}

/// Where a reference landed: the target subschema and the scope to evaluate it in.
#[derive(Debug, Clone)]
pub struct Resolved<'s> {
    pub schema: &'s Value,
    pub scope: Scope<'s>,
}

/// Resolves references against the root document and a populated registry.
pub struct Resolver<'s> {
    registry: &'s SchemaRegistry,
    local: HashMap<String, &'s Value>,
    max_depth: usize,
}

impl<'s> Resolver<'s> {
    /// Indexes the `$id`-bearing subschemas of `root` so the root document is
    /// addressable without being registered.
    pub fn new(
        registry: &'s SchemaRegistry,
        root: &'s Value,
        base: Option<&str>,
        max_depth: usize,
    ) -> Result<Self, SchemaError> {
        let mut local = HashMap::new();
        if let Some(base) = base {
            local.insert(normalize_uri(base), root);
        }
        for (key, pointer) in collect_resources(root, base, max_depth)? {
            if let Some(node) = root.pointer(&pointer) {
                local.entry(key).or_insert(node);
            }
        }
        Ok(Self {
            registry,
            local,
            max_depth,
        })
    }

    fn lookup(&self, key: &str) -> Option<&'s Value> {
        self.local
            .get(key)
            .copied()
            .or_else(|| self.registry.get(key))
    }

    /// Resolves `reference` as seen from `scope`.
    ///
    /// Fails with `UnresolvableReference` when the document is unknown or the
    /// fragment does not address a node.
    pub fn resolve(&self, scope: &Scope<'s>, reference: &str) -> Result<Resolved<'s>, SchemaError> {
        let (uri_part, fragment) = split_reference(reference);

        let (base, document) = if uri_part.is_empty() {
            (scope.base.clone(), scope.document)
        } else {
            let key = resolve_uri(scope.base.as_deref(), uri_part);
            let document = self
                .lookup(&key)
                .ok_or_else(|| SchemaError::unresolvable(reference, format!("{key} is not in the registry")))?;
            (Some(key), document)
        };

        let decoded = percent_decode_str(fragment)
            .decode_utf8()
            .map_err(|e| SchemaError::unresolvable(reference, format!("fragment is not UTF-8: {e}")))?;

        let schema = if decoded.is_empty() {
            document
        } else if decoded.starts_with('/') {
            resolve_pointer(document, &decoded).map_err(|reason| SchemaError::unresolvable(reference, reason))?
        } else {
            find_anchor(document, &decoded, self.max_depth)?.ok_or_else(|| {
                SchemaError::unresolvable(reference, format!("no subschema declares \"$id\": \"#{decoded}\""))
            })?
        };

        Ok(Resolved {
            schema,
            scope: Scope { base, document },
        })
    }
}

/// Splits at the first `#` into the URI part and the (still encoded) fragment.
pub fn split_reference(reference: &str) -> (&str, &str) {
    reference.split_once('#').unwrap_or((reference, ""))
}

/// Drops any fragment; absolute URIs are normalized by `url`.
pub fn normalize_uri(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => split_reference(uri).0.to_string(),
    }
}

/// Resolves a URI reference against an optional base, yielding a registry key.
///
/// Without an absolute base, relative references are joined path-wise against a
/// relative base, or used verbatim.
pub fn resolve_uri(base: Option<&str>, reference: &str) -> String {
    if Url::parse(reference).is_ok() {
        return normalize_uri(reference);
    }
    let Some(base) = base else {
        return normalize_uri(reference);
    };
    if let Ok(base_url) = Url::parse(base) {
        if let Ok(joined) = base_url.join(reference) {
            return normalize_uri(joined.as_str());
        }
    }
    match base.rsplit_once('/') {
        Some((dir, _)) if !reference.starts_with('/') => normalize_uri(&format!("{dir}/{reference}")),
        _ => normalize_uri(reference),
    }
}

/// Walks a decoded JSON Pointer (`/a/b/0`) through objects and arrays.
pub fn resolve_pointer<'a>(document: &'a Value, pointer: &str) -> Result<&'a Value, String> {
    if pointer.is_empty() {
        return Ok(document);
    }
    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(format!("JSON Pointer {pointer:?} must start with '/'"));
    };

    let mut node = document;
    for raw in rest.split('/') {
        let token = raw.replace("~1", "/").replace("~0", "~");
        node = match node {
            Value::Object(map) => map
                .get(&token)
                .ok_or_else(|| format!("no member {token:?} at {pointer:?}"))?,
            Value::Array(items) => {
                let index = parse_index(&token).ok_or_else(|| format!("{token:?} is not an array index"))?;
                items
                    .get(index)
                    .ok_or_else(|| format!("index {index} is out of range at {pointer:?}"))?
            }
            _ => return Err(format!("cannot descend into a scalar with {token:?}")),
        };
    }
    Ok(node)
}

fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// The subschemas directly below a schema object, each with the JSON Pointer
/// suffix that reaches it. Data-valued keywords such as `enum` are not entered.
fn subschemas(map: &Map<String, Value>) -> Vec<(String, &Value)> {
    let mut found = Vec::new();
    for (keyword, value) in map {
        match (keyword.as_str(), value) {
            ("items" | "allOf" | "anyOf" | "oneOf", Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    found.push((format!("/{keyword}/{i}"), item));
                }
            }
            (
                "items" | "additionalItems" | "contains" | "additionalProperties" | "propertyNames" | "not"
                | "if" | "then" | "else",
                _,
            ) => found.push((format!("/{keyword}"), value)),
            ("properties" | "patternProperties" | "definitions" | "dependencies", Value::Object(members)) => {
                for (name, member) in members {
                    // Array-valued dependencies are property lists.
                    if !member.is_array() {
                        found.push((format!("/{keyword}/{}", escape_token(name)), member));
                    }
                }
            }
            _ => {}
        }
    }
    found
}

fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn depth_guard(depth: usize, max_depth: usize) -> Result<(), SchemaError> {
    if depth >= max_depth {
        Err(SchemaError::DepthExceeded { limit: max_depth })
    } else {
        Ok(())
    }
}

/// Finds the subschema declaring the plain-name identifier `"$id": "#name"`.
pub fn find_anchor<'a>(document: &'a Value, name: &str, max_depth: usize) -> Result<Option<&'a Value>, SchemaError> {
    find_anchor_at(document, name, 0, max_depth)
}

fn find_anchor_at<'a>(
    node: &'a Value,
    name: &str,
    depth: usize,
    max_depth: usize,
) -> Result<Option<&'a Value>, SchemaError> {
    let Value::Object(map) = node else {
        return Ok(None);
    };
    depth_guard(depth, max_depth)?;
    if let Some(Value::String(id)) = map.get("$id") {
        if split_reference(id) == ("", name) {
            return Ok(Some(node));
        }
    }
    for (_, child) in subschemas(map) {
        if let Some(found) = find_anchor_at(child, name, depth + 1, max_depth)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Lists `(uri, json-pointer)` for every subschema whose `$id` names a resource.
///
/// Nested identifiers resolve against their enclosing resource.
pub fn collect_resources(
    document: &Value,
    base: Option<&str>,
    max_depth: usize,
) -> Result<Vec<(String, String)>, SchemaError> {
    let mut found = Vec::new();
    collect_into(document, base.map(str::to_string), String::new(), 0, max_depth, &mut found)?;
    Ok(found)
}

fn collect_into(
    node: &Value,
    base: Option<String>,
    pointer: String,
    depth: usize,
    max_depth: usize,
    found: &mut Vec<(String, String)>,
) -> Result<(), SchemaError> {
    let Value::Object(map) = node else {
        return Ok(());
    };
    depth_guard(depth, max_depth)?;
    let mut base = base;
    if let Some(Value::String(id)) = map.get("$id") {
        let (uri_part, _) = split_reference(id);
        if !uri_part.is_empty() {
            let key = resolve_uri(base.as_deref(), uri_part);
            found.push((key.clone(), pointer.clone()));
            base = Some(key);
        }
    }
    for (suffix, child) in subschemas(map) {
        collect_into(child, base.clone(), format!("{pointer}{suffix}"), depth + 1, max_depth, found)?;
    }
    Ok(())
}
