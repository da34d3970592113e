//! Keyword evaluators and the static table dispatching to them.
//!
//! Each evaluator receives the enclosing schema object (for keywords that read
//! their siblings), its own keyword value and the instance. The schema path
//! already ends with the keyword name when it is called. Keywords absent from
//! the table are annotations and are skipped.

mod array;
mod combinators;
mod conditional;
mod format;
mod numeric;
mod object;
mod reference;
mod string;
mod types;

use std::fmt;

use serde_json::{Map, Value};

use crate::engine::ResolutionContext;
use crate::error::SchemaError;
use crate::report::Violation;

pub type Keyword = for<'c, 's, 'i> fn(
    &'c mut ResolutionContext<'s>,
    &'s Map<String, Value>,
    &'s Value,
    &'i Value,
) -> Result<Vec<Violation>, SchemaError>;

/// A draft's keyword semantics.
pub struct Draft {
    pub name: &'static str,
    /// Draft 7 and earlier ignore every sibling of `$ref`.
    pub ref_overrides_siblings: bool,
    keywords: &'static [(&'static str, Keyword)],
}

impl Draft {
    pub fn lookup(&self, name: &str) -> Option<Keyword> {
        self.keywords
            .iter()
            .find(|(keyword, _)| *keyword == name)
            .map(|(_, evaluate)| *evaluate)
    }

    pub fn keyword_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keywords.iter().map(|(name, _)| *name)
    }
}

impl fmt::Debug for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Draft")
            .field("name", &self.name)
            .field("keywords", &self.keyword_names().collect::<Vec<_>>())
            .finish()
    }
}

// `then` and `else` are only read through `if`, so they have no entry.
pub static DRAFT7: Draft = Draft {
    name: "draft-07",
    ref_overrides_siblings: true,
    keywords: &[
        ("$ref", reference::reference),
        ("type", types::type_),
        ("enum", types::enum_),
        ("const", types::const_),
        ("allOf", combinators::all_of),
        ("anyOf", combinators::any_of),
        ("oneOf", combinators::one_of),
        ("not", combinators::not),
        ("if", conditional::if_),
        ("minimum", numeric::minimum),
        ("maximum", numeric::maximum),
        ("exclusiveMinimum", numeric::exclusive_minimum),
        ("exclusiveMaximum", numeric::exclusive_maximum),
        ("multipleOf", numeric::multiple_of),
        ("minLength", string::min_length),
        ("maxLength", string::max_length),
        ("pattern", string::pattern),
        ("format", format::format),
        ("items", array::items),
        ("additionalItems", array::additional_items),
        ("minItems", array::min_items),
        ("maxItems", array::max_items),
        ("uniqueItems", array::unique_items),
        ("contains", array::contains),
        ("properties", object::properties),
        ("patternProperties", object::pattern_properties),
        ("additionalProperties", object::additional_properties),
        ("required", object::required),
        ("minProperties", object::min_properties),
        ("maxProperties", object::max_properties),
        ("propertyNames", object::property_names),
        ("dependencies", object::dependencies),
    ],
};

/// Quotes a name the way messages print keys, types and formats.
pub(crate) fn quoted(name: &str) -> String {
    Value::String(name.to_string()).to_string()
}
