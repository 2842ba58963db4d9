//! Token tree data model
//!
//! A token tree is a nested, insertion-ordered mapping whose nodes are either
//! a [`TokenLeaf`] (a value with a `type` tag) or a nested [`TokenTree`].
//! Leaf values are parsed once, at load time, into [`TokenValue`] so that no
//! later stage has to look at brace syntax again.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::normalize::is_metadata_key;
use crate::reference::{fragments, is_whole_reference, Fragment, ReferencePath};

/// A literal leaf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(Number),
    Text(String),
    Bool(bool),
    /// Object or array values (typography, shadows, ...), carried through as-is
    Json(Value),
}

/// A leaf value as stored in the tree.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    Literal(Literal),
    /// The whole value is one `{path}` span
    Reference(ReferencePath),
    /// Text with one or more embedded `{path}` spans
    Composite(Vec<Fragment>),
}

impl TokenValue {
    /// Parse a raw JSON value. Strings are split into reference fragments.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => Self::from_text(s),
            Value::Number(n) => Self::Literal(Literal::Number(n)),
            Value::Bool(b) => Self::Literal(Literal::Bool(b)),
            other => Self::Literal(Literal::Json(other)),
        }
    }

    fn from_text(text: String) -> Self {
        if is_whole_reference(&text) {
            if let [Fragment::Reference(path)] = fragments(&text).as_slice() {
                return Self::Reference(path.clone());
            }
        }
        let parts = fragments(&text);
        if parts.iter().any(|p| matches!(p, Fragment::Reference(_))) {
            Self::Composite(parts)
        } else {
            Self::Literal(Literal::Text(text))
        }
    }

    /// Wire representation, identical to what was loaded.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Literal(Literal::Number(n)) => Value::Number(n.clone()),
            Self::Literal(Literal::Text(s)) => Value::String(s.clone()),
            Self::Literal(Literal::Bool(b)) => Value::Bool(*b),
            Self::Literal(Literal::Json(v)) => v.clone(),
            Self::Reference(path) => Value::String(path.to_string()),
            Self::Composite(parts) => Value::String(render_fragments(parts)),
        }
    }

    /// Literal equality on the stored value. References are compared by their
    /// text, never by what they resolve to. Numbers compare numerically.
    pub fn same_as(&self, other: &TokenValue) -> bool {
        match (self, other) {
            (Self::Literal(Literal::Number(a)), Self::Literal(Literal::Number(b))) => {
                a.as_f64() == b.as_f64()
            }
            _ => self.to_json() == other.to_json(),
        }
    }

    /// Primitive kind of the stored value, as a type-level name.
    pub fn primitive_kind(&self) -> &'static str {
        match self {
            Self::Literal(Literal::Number(_)) => "number",
            Self::Literal(Literal::Bool(_)) => "boolean",
            Self::Literal(Literal::Json(_)) => "unknown",
            Self::Literal(Literal::Text(_)) | Self::Reference(_) | Self::Composite(_) => "string",
        }
    }
}

pub(crate) fn render_fragments(parts: &[Fragment]) -> String {
    parts
        .iter()
        .map(|p| match p {
            Fragment::Text(t) => t.clone(),
            Fragment::Reference(path) => path.to_string(),
        })
        .collect()
}

/// A single token: value, type tag and any extra fields (`description`, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct TokenLeaf {
    pub value: TokenValue,
    pub kind: String,
    pub extra: IndexMap<String, Value>,
}

impl TokenLeaf {
    pub fn new(value: impl Into<Value>, kind: impl Into<String>) -> Self {
        Self {
            value: TokenValue::from_json(value.into()),
            kind: kind.into(),
            extra: IndexMap::new(),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("value".to_string(), self.value.to_json());
        obj.insert("type".to_string(), Value::String(self.kind.clone()));
        for (k, v) in &self.extra {
            obj.insert(k.clone(), v.clone());
        }
        Value::Object(obj)
    }
}

/// Node of a token tree.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode {
    Leaf(TokenLeaf),
    Branch(TokenTree),
    /// Reserved-marker entry (`$extensions`, ...), kept verbatim
    Meta(Value),
}

impl TreeNode {
    pub fn as_leaf(&self) -> Option<&TokenLeaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Branch(_) | Self::Meta(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Leaf(leaf) => leaf.to_json(),
            Self::Branch(tree) => tree.to_json(),
            Self::Meta(value) => value.clone(),
        }
    }
}

/// A leaf together with its full path from the tree root.
#[derive(Clone, Debug)]
pub struct LeafEntry<'a> {
    pub path: Vec<String>,
    pub leaf: &'a TokenLeaf,
}

/// Insertion-ordered token tree. Tokens, groups and `$` entries share one
/// map so their relative order survives a round trip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenTree {
    nodes: IndexMap<String, TreeNode>,
}

impl TokenTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a typed tree from a JSON object.
    ///
    /// An object holding both `value` and `type` is a leaf, any other object
    /// is a branch. Nodes that are neither are dropped with a warning.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map, &mut Vec::new()),
            other => {
                tracing::warn!("token set is not an object ({}), treating as empty", kind_name(other));
                Self::new()
            }
        }
    }

    fn from_map(map: &Map<String, Value>, path: &mut Vec<String>) -> Self {
        let mut tree = Self::new();
        for (key, value) in map {
            if is_metadata_key(key) {
                tree.nodes.insert(key.clone(), TreeNode::Meta(value.clone()));
                continue;
            }
            path.push(key.clone());
            match value {
                Value::Object(obj) if obj.contains_key("value") => match leaf_from_object(obj) {
                    Some(leaf) => {
                        tree.nodes.insert(key.clone(), TreeNode::Leaf(leaf));
                    }
                    None => tracing::warn!(
                        "dropping `{}`: token needs a string `type` next to its `value`",
                        path.join(".")
                    ),
                },
                Value::Object(obj) => {
                    let child = Self::from_map(obj, path);
                    tree.nodes.insert(key.clone(), TreeNode::Branch(child));
                }
                other => tracing::warn!(
                    "dropping `{}`: expected a token or a group, found {}",
                    path.join("."),
                    kind_name(other)
                ),
            }
            path.pop();
        }
        tree
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        for (key, node) in &self.nodes {
            obj.insert(key.clone(), node.to_json());
        }
        Value::Object(obj)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, node: TreeNode) -> &mut Self {
        self.nodes.insert(key.into(), node);
        self
    }

    /// Builder-style insert of a leaf.
    pub fn with_leaf(mut self, key: impl Into<String>, leaf: TokenLeaf) -> Self {
        self.nodes.insert(key.into(), TreeNode::Leaf(leaf));
        self
    }

    /// Builder-style insert of a nested group.
    pub fn with_branch(mut self, key: impl Into<String>, branch: TokenTree) -> Self {
        self.nodes.insert(key.into(), TreeNode::Branch(branch));
        self
    }

    pub fn get(&self, key: &str) -> Option<&TreeNode> {
        self.nodes.get(key)
    }

    /// Tokens and groups, without `$` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TreeNode)> {
        self.nodes
            .iter()
            .filter(|(_, node)| !matches!(node, TreeNode::Meta(_)))
    }

    /// Every entry in insertion order, `$` entries included.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &TreeNode)> {
        self.nodes.iter()
    }

    pub fn meta(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.nodes.iter().filter_map(|(key, node)| match node {
            TreeNode::Meta(value) => Some((key, value)),
            _ => None,
        })
    }

    /// Look a node up by path segments.
    pub fn node_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&TreeNode> {
        let (first, rest) = path.split_first()?;
        let node = self.nodes.get(first.as_ref())?;
        if rest.is_empty() {
            return Some(node);
        }
        match node {
            TreeNode::Branch(child) => child.node_at(rest),
            TreeNode::Leaf(_) | TreeNode::Meta(_) => None,
        }
    }

    pub fn leaf_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&TokenLeaf> {
        self.node_at(path).and_then(TreeNode::as_leaf)
    }

    /// All leaves in depth-first insertion order.
    pub fn leaves(&self) -> Vec<LeafEntry<'_>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, path: &mut Vec<String>, out: &mut Vec<LeafEntry<'a>>) {
        for (key, node) in &self.nodes {
            path.push(key.clone());
            match node {
                TreeNode::Leaf(leaf) => out.push(LeafEntry {
                    path: path.clone(),
                    leaf,
                }),
                TreeNode::Branch(child) => child.collect_leaves(path, out),
                TreeNode::Meta(_) => {}
            }
            path.pop();
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| match node {
                TreeNode::Leaf(_) => 1,
                TreeNode::Branch(child) => child.leaf_count(),
                TreeNode::Meta(_) => 0,
            })
            .sum()
    }

    /// Deep-merge `source` into `self`.
    ///
    /// Groups merge recursively; leaves and metadata values from `source`
    /// replace whatever `self` holds at the same key. Leaves are atomic and
    /// never merged field-by-field.
    pub fn merge_from(&mut self, source: &TokenTree) -> &mut Self {
        for (key, node) in &source.nodes {
            match node {
                TreeNode::Branch(src_child) => {
                    let slot = self
                        .nodes
                        .entry(key.clone())
                        .or_insert_with(|| TreeNode::Branch(TokenTree::new()));
                    if !matches!(slot, TreeNode::Branch(_)) {
                        *slot = TreeNode::Branch(TokenTree::new());
                    }
                    if let TreeNode::Branch(dst_child) = slot {
                        dst_child.merge_from(src_child);
                    }
                }
                other => {
                    self.nodes.insert(key.clone(), other.clone());
                }
            }
        }
        self
    }

    /// A fresh tree holding `lower` with `upper` merged over it; `upper` wins
    /// wherever both define a path.
    pub fn overlay(lower: &TokenTree, upper: &TokenTree) -> TokenTree {
        let mut out = TokenTree::new();
        out.merge_from(lower).merge_from(upper);
        out
    }
}

fn leaf_from_object(obj: &Map<String, Value>) -> Option<TokenLeaf> {
    let value = obj.get("value")?.clone();
    let kind = obj.get("type")?.as_str()?.to_string();
    let extra = obj
        .iter()
        .filter(|(k, _)| k.as_str() != "value" && k.as_str() != "type")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Some(TokenLeaf {
        value: TokenValue::from_json(value),
        kind,
        extra,
    })
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn leaf(value: impl Into<Value>, kind: &str) -> TokenLeaf {
        TokenLeaf::new(value, kind)
    }

    #[test]
    fn parses_leaves_and_branches() {
        let tree = TokenTree::from_json(&json!({
            "color": {
                "brand": { "value": "#fff", "type": "color", "description": "main" },
                "alias": { "value": "{color.brand}", "type": "color" },
                "fade": { "value": "linear-gradient({color.brand}, #000)", "type": "color" }
            },
            "$extensions": { "x": 1 }
        }));

        assert_eq!(tree.leaf_count(), 3);
        let brand = tree.leaf_at(&["color", "brand"]).unwrap();
        assert_eq!(brand.value, TokenValue::Literal(Literal::Text("#fff".into())));
        assert_eq!(brand.extra.get("description"), Some(&json!("main")));

        let alias = tree.leaf_at(&["color", "alias"]).unwrap();
        assert_eq!(alias.value, TokenValue::Reference(ReferencePath::parse("color.brand")));

        let fade = tree.leaf_at(&["color", "fade"]).unwrap();
        assert!(matches!(fade.value, TokenValue::Composite(_)));
        assert_eq!(fade.value.to_json(), json!("linear-gradient({color.brand}, #000)"));
        assert_eq!(tree.meta().count(), 1);
    }

    #[test]
    fn drops_malformed_nodes() {
        let tree = TokenTree::from_json(&json!({
            "list": [1, 2],
            "scalar": 3,
            "untyped": { "value": 4 },
            "ok": { "value": 4, "type": "number" }
        }));
        let keys: Vec<_> = tree.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["ok"]);
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let raw = json!({
            "z": { "value": 1, "type": "number" },
            "a": { "b": { "value": "x", "type": "text", "description": "d" } }
        });
        let tree = TokenTree::from_json(&raw);
        assert_eq!(tree.to_json(), raw);
        assert_eq!(
            serde_json::to_string(&tree.to_json()).unwrap(),
            serde_json::to_string(&raw).unwrap()
        );
    }

    #[test]
    fn metadata_keeps_its_place_among_tokens() {
        let raw = json!({
            "$description": "palette",
            "color": {
                "brand": { "value": "#fff", "type": "color" },
                "$extensions": { "x": 1 },
                "bg": { "value": "#000", "type": "color" }
            },
            "$extensions": { "y": 2 },
            "spacing": { "sm": { "value": 4, "type": "number" } }
        });
        let tree = TokenTree::from_json(&raw);
        assert_eq!(
            serde_json::to_string(&tree.to_json()).unwrap(),
            serde_json::to_string(&raw).unwrap()
        );
        let keys: Vec<_> = tree.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["color", "spacing"]);
        assert_eq!(tree.meta().count(), 2);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn merge_recurses_into_groups() {
        let mut target = TokenTree::new().with_branch(
            "color",
            TokenTree::new().with_leaf("a", leaf("#111", "color")),
        );
        let source = TokenTree::new()
            .with_branch("color", TokenTree::new().with_leaf("b", leaf("#222", "color")))
            .with_branch("spacing", TokenTree::new().with_leaf("sm", leaf(4, "number")));

        target.merge_from(&source);
        assert!(target.leaf_at(&["color", "a"]).is_some());
        assert!(target.leaf_at(&["color", "b"]).is_some());
        assert!(target.leaf_at(&["spacing", "sm"]).is_some());
    }

    #[test]
    fn merge_replaces_leaves_atomically() {
        let mut with_extra = leaf("#111", "color");
        with_extra
            .extra
            .insert("description".into(), json!("old"));
        let mut target = TokenTree::new().with_leaf("a", with_extra);
        let source = TokenTree::new().with_leaf("a", leaf("#222", "color"));

        target.merge_from(&source);
        let merged = target.leaf_at(&["a"]).unwrap();
        assert_eq!(merged.value.to_json(), json!("#222"));
        assert!(merged.extra.is_empty());
    }

    #[test]
    fn overlay_precedence() {
        let a = TokenTree::new()
            .with_leaf("p", leaf(1, "number"))
            .with_leaf("only_a", leaf(2, "number"));
        let b = TokenTree::new().with_leaf("p", leaf(10, "number"));

        // b already defines `p`: its value stays, `only_a` is adopted from a
        let merged = TokenTree::overlay(&a, &b);
        assert_eq!(merged.leaf_at(&["p"]).unwrap().value.to_json(), json!(10));
        assert_eq!(merged.leaf_at(&["only_a"]).unwrap().value.to_json(), json!(2));
    }

    #[test]
    fn branch_replaces_leaf_on_merge() {
        let mut target = TokenTree::new().with_leaf("x", leaf(1, "number"));
        let source =
            TokenTree::new().with_branch("x", TokenTree::new().with_leaf("y", leaf(2, "number")));
        target.merge_from(&source);
        assert!(target.leaf_at(&["x", "y"]).is_some());
    }

    #[test]
    fn numeric_sameness_ignores_representation() {
        let int = TokenValue::from_json(json!(4));
        let float = TokenValue::from_json(json!(4.0));
        let text = TokenValue::from_json(json!("4"));
        assert!(int.same_as(&float));
        assert!(!int.same_as(&text));
    }
}
