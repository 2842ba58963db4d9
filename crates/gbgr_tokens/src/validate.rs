//! Post-build validation
//!
//! Works on the emitted JSON dump rather than on in-memory trees, so it also
//! catches emission bugs. Every check runs to completion and all findings are
//! reported together.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::artifacts;
use crate::error::{Result, TokensError};
use crate::normalize::is_metadata_key;
use crate::reference::{is_whole_reference, references};
use crate::tree::kind_name;

/// A single validation finding.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{file} not found. Run build first.")]
    MissingArtifact { file: String },

    #[error("{path}: {message}")]
    Malformed { path: String, message: String },

    #[error("{path}: {message}")]
    InvalidValue { path: String, message: String },

    #[error("{path}: reference \"{reference}\" points to non-existent token path \"{target}\"")]
    BrokenReference {
        path: String,
        reference: String,
        target: String,
    },
}

impl ValidationError {
    fn malformed(path: &str, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.to_string(),
            message: message.into(),
        }
    }

    fn invalid(path: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Outcome of one check: nothing, or everything it found.
pub type Outcome = std::result::Result<(), Vec<ValidationError>>;

fn outcome(errors: Vec<ValidationError>) -> Outcome {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Aggregate result of a validation run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
    pub token_count: usize,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold one check's outcome into the report.
    pub fn absorb(mut self, outcome: Outcome) -> Self {
        if let Err(errors) = outcome {
            self.errors.extend(errors);
        }
        self
    }
}

fn hex_color() -> &'static Regex {
    static HEX: OnceLock<Regex> = OnceLock::new();
    HEX.get_or_init(|| {
        Regex::new(r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").expect("static hex pattern")
    })
}

fn gradient() -> &'static Regex {
    static GRADIENT: OnceLock<Regex> = OnceLock::new();
    GRADIENT.get_or_init(|| {
        Regex::new(r"^(repeating-)?(linear|radial|conic)-gradient\(").expect("static gradient pattern")
    })
}

fn is_color_value(s: &str) -> bool {
    hex_color().is_match(s)
        || s.starts_with("rgb(")
        || s.starts_with("rgba(")
        || is_whole_reference(s)
        || gradient().is_match(s)
}

/// Check a leaf value against its declared type. Unknown types pass.
pub fn check_value(path: &str, value: &Value, kind: &str) -> Option<ValidationError> {
    match kind {
        "color" => match value.as_str() {
            None => Some(ValidationError::invalid(path, "color value must be a string")),
            Some(s) if !is_color_value(s) => Some(ValidationError::invalid(
                path,
                format!(
                    "invalid color value \"{s}\". Expected hex (#fff or #ffffff), rgb/rgba, reference ({{...}}), or gradient"
                ),
            )),
            Some(_) => None,
        },
        "number" => (!value.is_number())
            .then(|| ValidationError::invalid(path, "number value must be a number")),
        "opacity" => match value.as_f64() {
            None => Some(ValidationError::invalid(path, "opacity value must be a number")),
            Some(v) if !(0.0..=1.0).contains(&v) => Some(ValidationError::invalid(
                path,
                "opacity value must be between 0 and 1",
            )),
            Some(_) => None,
        },
        "text" => (!value.is_string())
            .then(|| ValidationError::invalid(path, "text value must be a string")),
        _ => None,
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn is_leaf(obj: &Map<String, Value>) -> bool {
    obj.contains_key("value") && obj.contains_key("type")
}

/// Every node must be a token (`value` + `type`) or a group; token values
/// must match their type.
pub fn check_structure(tokens: &Value) -> Outcome {
    let Value::Object(root) = tokens else {
        return Err(vec![ValidationError::malformed(
            "root",
            format!("must be an object, found {}", kind_name(tokens)),
        )]);
    };
    let mut errors = Vec::new();
    walk_structure(root, "", &mut errors);
    outcome(errors)
}

fn walk_structure(group: &Map<String, Value>, parent: &str, errors: &mut Vec<ValidationError>) {
    for (key, node) in group {
        if is_metadata_key(key) {
            continue;
        }
        let path = join(parent, key);
        match node {
            Value::Object(obj) if is_leaf(obj) => match obj.get("type").and_then(Value::as_str) {
                Some(kind) => {
                    if let Some(value) = obj.get("value") {
                        errors.extend(check_value(&path, value, kind));
                    }
                }
                None => errors.push(ValidationError::malformed(&path, "\"type\" must be a string")),
            },
            Value::Object(obj) if obj.contains_key("value") => {
                errors.push(ValidationError::malformed(&path, "missing required field \"type\""));
            }
            Value::Object(obj) if obj.get("type").is_some_and(Value::is_string) => {
                errors.push(ValidationError::malformed(&path, "missing required field \"value\""));
            }
            Value::Object(obj) => walk_structure(obj, &path, errors),
            Value::Array(_) => errors.push(ValidationError::malformed(
                &path,
                "arrays are not supported in token structure",
            )),
            other => errors.push(ValidationError::malformed(
                &path,
                format!("expected a token or a group, found {}", kind_name(other)),
            )),
        }
    }
}

fn collect_leaves<'a>(
    group: &'a Map<String, Value>,
    parent: &str,
    out: &mut Vec<(String, &'a Map<String, Value>)>,
) {
    for (key, node) in group {
        if is_metadata_key(key) {
            continue;
        }
        if let Value::Object(obj) = node {
            let path = join(parent, key);
            if is_leaf(obj) {
                out.push((path, obj));
            } else {
                collect_leaves(obj, &path, out);
            }
        }
    }
}

fn leaves(tokens: &Value) -> Vec<(String, &Map<String, Value>)> {
    let mut out = Vec::new();
    if let Value::Object(root) = tokens {
        collect_leaves(root, "", &mut out);
    }
    out
}

/// Every `{...}` span in a token value must name an existing token.
pub fn check_references(tokens: &Value) -> Outcome {
    let all = leaves(tokens);
    let known: HashSet<&str> = all.iter().map(|(path, _)| path.as_str()).collect();

    let mut errors = Vec::new();
    for (path, leaf) in &all {
        let Some(value) = leaf.get("value").and_then(Value::as_str) else {
            continue;
        };
        for r in references(value) {
            let target = r.dotted();
            if !known.contains(target.as_str()) {
                errors.push(ValidationError::BrokenReference {
                    path: path.clone(),
                    reference: r.to_string(),
                    target,
                });
            }
        }
    }
    outcome(errors)
}

/// Number of tokens in a JSON tree.
pub fn count_tokens(tokens: &Value) -> usize {
    leaves(tokens).len()
}

/// Run every token check over a parsed dump.
pub fn validate_tokens(tokens: &Value) -> ValidationReport {
    let checks: [fn(&Value) -> Outcome; 2] = [check_structure, check_references];
    let mut report = checks
        .iter()
        .map(|check| check(tokens))
        .fold(ValidationReport::default(), ValidationReport::absorb);

    report.token_count = count_tokens(tokens);
    if report.token_count == 0 {
        report.warnings.push("No tokens found in the file".to_string());
    }
    report
}

/// Every artifact a build writes must exist.
pub fn check_artifacts(out_dir: &Path) -> Outcome {
    outcome(
        artifacts::ALL
            .iter()
            .filter(|name| !out_dir.join(name).exists())
            .map(|name| ValidationError::MissingArtifact {
                file: out_dir.join(name).display().to_string(),
            })
            .collect(),
    )
}

/// Validate a build output directory.
///
/// Missing artifacts end the run early; otherwise the JSON dump is parsed
/// and every token check runs.
pub fn validate_dir(out_dir: &Path) -> Result<ValidationReport> {
    tracing::info!("validating {}", out_dir.display());
    if let Err(errors) = check_artifacts(out_dir) {
        return Ok(ValidationReport {
            errors,
            ..ValidationReport::default()
        });
    }

    let path = out_dir.join(artifacts::INPUT_JSON);
    let raw = std::fs::read_to_string(&path).map_err(|e| TokensError::io(&path, e))?;
    let tokens: Value = serde_json::from_str(&raw)
        .map_err(|e| TokensError::json(path.display().to_string(), e))?;
    Ok(validate_tokens(&tokens))
}
