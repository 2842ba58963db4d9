//! Token set loading
//!
//! A raw export is one JSON object whose keys are compound set names
//! (`"Primitives/light/Primitives/light"`, `"global/global"`) plus optional
//! `$`-prefixed metadata keys. Each set is normalized (keys + references) and
//! tagged with the collection/mode parsed from its name.

use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{Result, TokensError};
use crate::normalize::{
    is_metadata_key, normalize_collection_name, normalize_key, normalize_mode_name,
};
use crate::reference::rewrite_references;
use crate::tree::{kind_name, TokenTree};

/// Collection/mode pair parsed from a set name, before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetKey {
    pub collection: String,
    pub mode: String,
}

/// Split a compound set name into its collection and mode.
///
/// - `"Primitives/light/Primitives/light"` -> (`Primitives`, `light`)
/// - `"global/global"` -> (`global`, `global`)
/// - `"Brand"` -> (`Brand`, `default`)
pub fn parse_set_key(name: &str) -> SetKey {
    let parts: Vec<&str> = name.split('/').filter(|s| !s.is_empty()).collect();
    match parts.as_slice() {
        [c, m, c2, m2, ..] if c == c2 && m == m2 => SetKey {
            collection: c.to_string(),
            mode: m.to_string(),
        },
        [c, m, ..] => SetKey {
            collection: c.to_string(),
            mode: m.to_string(),
        },
        [c] => SetKey {
            collection: c.to_string(),
            mode: "default".to_string(),
        },
        [] => SetKey {
            collection: name.to_string(),
            mode: "default".to_string(),
        },
    }
}

/// Recursively normalize a raw JSON subtree.
///
/// Object keys are canonicalized (metadata keys are kept as-is, their values
/// still normalized) and every string has its reference spans rewritten.
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(normalize_value).collect()),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, child) in map {
                let key = if is_metadata_key(key) {
                    key.clone()
                } else {
                    normalize_key(key)
                };
                out.insert(key, normalize_value(child));
            }
            Value::Object(out)
        }
        Value::String(s) => Value::String(rewrite_references(s)),
        other => other.clone(),
    }
}

/// One named set from the export.
#[derive(Clone, Debug)]
pub struct TokenSet {
    /// Compound name as it appears in the export
    pub name: String,
    /// Normalized collection name (`primitives`)
    pub collection: String,
    /// Normalized mode name (`light`, `dark`, `global`, ...)
    pub mode: String,
    /// Normalized JSON, kept for the normalization entry point
    pub raw: Value,
    pub tree: TokenTree,
}

/// A fully loaded and normalized export.
#[derive(Clone, Debug, Default)]
pub struct Export {
    sets: Vec<TokenSet>,
    metadata: IndexMap<String, Value>,
}

impl Export {
    /// Load an export from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(input).map_err(|e| TokensError::json("token export", e))?;
        Self::from_value(&value)
    }

    /// Load an export from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| TokensError::io(path, e))?;
        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| TokensError::json(path.display().to_string(), e))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(top) = value else {
            return Err(TokensError::InputMalformed(format!(
                "token export must be an object, found {}",
                kind_name(value)
            )));
        };

        let mut export = Export::default();
        for (name, body) in top {
            if is_metadata_key(name) {
                export.metadata.insert(name.clone(), body.clone());
                continue;
            }
            let key = parse_set_key(name);
            let raw = normalize_value(body);
            let tree = TokenTree::from_json(&raw);
            let set = TokenSet {
                name: name.clone(),
                collection: normalize_collection_name(&key.collection),
                mode: normalize_mode_name(&key.mode),
                raw,
                tree,
            };
            tracing::debug!(
                "loaded set `{}` as {}/{} ({} tokens)",
                set.name,
                set.collection,
                set.mode,
                set.tree.leaf_count()
            );
            export.sets.push(set);
        }
        Ok(export)
    }

    pub fn sets(&self) -> &[TokenSet] {
        &self.sets
    }

    /// Top-level `$` entries, untouched.
    pub fn metadata(&self) -> &IndexMap<String, Value> {
        &self.metadata
    }

    /// Find a set by its compound name as written in the export.
    pub fn set(&self, name: &str) -> Option<&TokenSet> {
        self.sets.iter().find(|s| s.name == name)
    }

    /// Find a set by normalized collection and mode. The last match wins,
    /// mirroring how later sets overwrite earlier ones when regrouped.
    pub fn set_for(&self, collection: &str, mode: &str) -> Option<&TokenSet> {
        self.sets
            .iter()
            .rev()
            .find(|s| s.collection == collection && s.mode == mode)
    }

    /// Find a set by compound name, falling back to the collection/mode the
    /// name parses to, so `Primitives/light` also finds
    /// `Primitives/light/Primitives/light`.
    pub fn lookup(&self, name: &str) -> Option<&TokenSet> {
        self.set(name).or_else(|| {
            let key = parse_set_key(name);
            self.set_for(
                &normalize_collection_name(&key.collection),
                &normalize_mode_name(&key.mode),
            )
        })
    }

    /// Tree for a named set (see [`Export::lookup`]); a missing set is an
    /// empty tree.
    pub fn tree_or_empty(&self, name: &str) -> TokenTree {
        match self.lookup(name) {
            Some(set) => set.tree.clone(),
            None => {
                tracing::warn!("token set `{name}` not found in export, using an empty set");
                TokenTree::new()
            }
        }
    }

    /// Regroup the export as `collections[<collection>][<mode>]`.
    ///
    /// `$metadata` and `$themes` are always present; every other top-level
    /// metadata key is passed through unchanged after them.
    pub fn to_normalized_document(&self) -> Value {
        let mut collections: Map<String, Value> = Map::new();
        for set in &self.sets {
            let modes = collections
                .entry(set.collection.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(modes) = modes {
                modes.insert(set.mode.clone(), set.raw.clone());
            }
        }

        let mut doc = Map::new();
        doc.insert("collections".to_string(), Value::Object(collections));
        doc.insert(
            "$metadata".to_string(),
            self.metadata
                .get("$metadata")
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
        );
        doc.insert(
            "$themes".to_string(),
            self.metadata
                .get("$themes")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
        );
        for (key, value) in &self.metadata {
            if !doc.contains_key(key) {
                doc.insert(key.clone(), value.clone());
            }
        }
        Value::Object(doc)
    }
}
