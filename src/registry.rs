use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::SchemaError;
use crate::resolver::{collect_resources, normalize_uri};
use crate::wellformed;

/// Schema documents addressable by `$ref`, keyed by URI.
///
/// Populated before validation starts and read-only afterwards, so one
/// registry can be shared by reference across concurrent validations.
#[derive(Default)]
pub struct SchemaRegistry {
    documents: HashMap<String, Value>,
    /// Embedded `$id` resources: URI to (document key, JSON Pointer).
    resources: HashMap<String, (String, String)>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `document` under `uri`.
    ///
    /// The document is checked for well-formedness first, nested at most
    /// [`DEFAULT_MAX_DEPTH`] levels; its root `$id` and any embedded `$id`s
    /// become additional addresses for it.
    pub fn insert(&mut self, uri: &str, document: Value) -> Result<(), SchemaError> {
        wellformed::check_with_depth(&document, DEFAULT_MAX_DEPTH)?;

        let key = normalize_uri(uri);
        for (resource, pointer) in collect_resources(&document, Some(&key), DEFAULT_MAX_DEPTH)? {
            if resource != key {
                self.resources.insert(resource, (key.clone(), pointer));
            }
        }
        tracing::debug!(uri = %key, "registered schema document");
        self.documents.insert(key, document);
        Ok(())
    }

    /// Looks up a document or embedded resource; any fragment is ignored.
    pub fn get(&self, uri: &str) -> Option<&Value> {
        let key = normalize_uri(uri);
        if let Some(document) = self.documents.get(&key) {
            return Some(document);
        }
        let (document_key, pointer) = self.resources.get(&key)?;
        self.documents.get(document_key)?.pointer(pointer)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.get(uri).is_some()
    }

    /// Number of registered documents, not counting embedded resources.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut uris: Vec<&String> = self.documents.keys().chain(self.resources.keys()).collect();
        uris.sort();
        f.debug_struct("SchemaRegistry").field("uris", &uris).finish()
    }
}
