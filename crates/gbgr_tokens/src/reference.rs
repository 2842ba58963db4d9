//! Cross-token references
//!
//! A reference is a `{dot.separated.path}` span inside a string value. It can
//! be the whole value (`"{color.global.white}"`) or embedded in other text
//! (`"linear-gradient(90deg, {color.a} 0%, {color.b} 100%)"`). Only the span
//! itself is ever rewritten.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::normalize::normalize_key;

fn span_regex() -> &'static Regex {
    static SPAN: OnceLock<Regex> = OnceLock::new();
    SPAN.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("static reference pattern"))
}

/// Path of a referenced token, one entry per segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReferencePath(Vec<String>);

impl ReferencePath {
    /// Split a dotted path without touching its segments.
    pub fn parse(dotted: &str) -> Self {
        Self(dotted.split('.').map(str::to_string).collect())
    }

    /// Split a dotted path and canonicalize every segment.
    pub fn parse_normalized(dotted: &str) -> Self {
        Self(dotted.split('.').map(normalize_key).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Dotted form, as it appears between the braces.
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

impl fmt::Display for ReferencePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.dotted())
    }
}

/// Piece of a string value: literal text or a reference span.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    Text(String),
    Reference(ReferencePath),
}

/// Split a string into text and reference fragments.
///
/// Reference segments are taken verbatim; strings loaded through the
/// [`loader`](crate::loader) have already been rewritten.
pub fn fragments(value: &str) -> Vec<Fragment> {
    let mut out = Vec::new();
    let mut cursor = 0;
    for caps in span_regex().captures_iter(value) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            out.push(Fragment::Text(value[cursor..whole.start()].to_string()));
        }
        out.push(Fragment::Reference(ReferencePath::parse(inner.as_str())));
        cursor = whole.end();
    }
    if cursor < value.len() {
        out.push(Fragment::Text(value[cursor..].to_string()));
    }
    out
}

/// Every reference path found in `value`, in order of appearance.
pub fn references(value: &str) -> Vec<ReferencePath> {
    span_regex()
        .captures_iter(value)
        .filter_map(|caps| caps.get(1))
        .map(|inner| ReferencePath::parse(inner.as_str()))
        .collect()
}

/// Rewrite every `{...}` span so its segments match normalized keys.
///
/// - `"{color.semantic.point.olive green}"` -> `"{color.semantic.point.olive-green}"`
/// - `"{color.sementic.brand.primary}"` -> `"{color.semantic.brand.primary}"`
///
/// Text outside the braces is left untouched.
pub fn rewrite_references(value: &str) -> String {
    if !value.contains('{') {
        return value.to_string();
    }
    span_regex()
        .replace_all(value, |caps: &regex::Captures<'_>| {
            ReferencePath::parse_normalized(&caps[1]).to_string()
        })
        .into_owned()
}

/// Whether the whole string is exactly one reference span.
pub fn is_whole_reference(value: &str) -> bool {
    value.len() > 2
        && value.starts_with('{')
        && value.ends_with('}')
        && !value[1..value.len() - 1].contains('}')
}
