//! Named checkers for the `format` keyword.
//!
//! Unknown format names are not errors: the keyword is then an annotation.

use std::collections::HashMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use url::Url;

/// A predicate over string instances.
pub type FormatChecker = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone, Default)]
pub struct FormatRegistry {
    checkers: HashMap<String, FormatChecker>,
}

impl FormatRegistry {
    /// An empty registry: every `format` passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// The Draft-7 formats.
    pub fn draft7() -> Self {
        let mut registry = Self::new();
        registry.register("date-time", is_date_time);
        registry.register("date", is_date);
        registry.register("time", is_time);
        registry.register("email", is_email);
        registry.register("idn-email", is_email);
        registry.register("hostname", is_hostname);
        registry.register("idn-hostname", is_idn_hostname);
        registry.register("ipv4", |s| s.parse::<Ipv4Addr>().is_ok());
        registry.register("ipv6", |s| s.parse::<Ipv6Addr>().is_ok());
        registry.register("uri", is_uri);
        registry.register("uri-reference", is_uri_reference);
        registry.register("iri", is_uri);
        registry.register("iri-reference", is_uri_reference);
        registry.register("uri-template", is_uri_template);
        registry.register("json-pointer", is_json_pointer);
        registry.register("relative-json-pointer", is_relative_json_pointer);
        registry.register("regex", |s| regex::Regex::new(s).is_ok());
        registry
    }

    /// Adds or replaces the checker for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, checker: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.checkers.insert(name.into(), Arc::new(checker));
    }

    pub fn get(&self, name: &str) -> Option<&FormatChecker> {
        self.checkers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checkers.contains_key(name)
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.checkers.keys().collect();
        names.sort();
        f.debug_struct("FormatRegistry").field("formats", &names).finish()
    }
}

fn is_date_time(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
}

fn is_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

// RFC 3339 full-time, checked by borrowing a fixed full-date.
fn is_time(s: &str) -> bool {
    DateTime::parse_from_rfc3339(&format!("1970-01-01T{s}")).is_ok()
}

fn is_email(s: &str) -> bool {
    match s.rsplit_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !s.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn is_hostname(s: &str) -> bool {
    let host = s.strip_suffix('.').unwrap_or(s);
    !host.is_empty()
        && host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

fn is_idn_hostname(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|label| {
            !label.is_empty()
                && label.chars().count() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}

fn is_uri(s: &str) -> bool {
    Url::parse(s).is_ok()
}

fn is_uri_reference(s: &str) -> bool {
    if s.chars().any(|c| c.is_whitespace() || c == '\\') {
        return false;
    }
    if Url::parse(s).is_ok() {
        return true;
    }
    Url::parse("http://relative.invalid/")
        .and_then(|base| base.join(s))
        .is_ok()
}

fn is_uri_template(s: &str) -> bool {
    let mut open = false;
    for c in s.chars() {
        match c {
            '{' if open => return false,
            '{' => open = true,
            '}' if !open => return false,
            '}' => open = false,
            _ => {}
        }
    }
    !open
}

fn is_json_pointer(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if !s.starts_with('/') {
        return false;
    }
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '~' && !matches!(chars.next(), Some('0') | Some('1')) {
            return false;
        }
    }
    true
}

fn is_relative_json_pointer(s: &str) -> bool {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || (digits > 1 && s.starts_with('0')) {
        return false;
    }
    let rest = &s[digits..];
    rest == "#" || is_json_pointer(rest)
}
