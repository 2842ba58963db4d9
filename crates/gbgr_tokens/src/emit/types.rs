//! Type description generation
//!
//! Mirrors the token tree as a TypeScript declaration so consumers get
//! compile-time checking of token paths. Every leaf becomes
//! `TokenLeaf<kind, "type">`, every group a structural record.

use std::fmt::Write as _;

use super::format::FILE_HEADER;
use crate::tree::{TokenTree, TreeNode};

const LEAF_TYPE: &str = "export type TokenLeaf<V, T extends string> = {
  value: V;
  type: T;
  [key: string]: unknown;
};
";

const EMPTY_RECORD: &str = "Record<string, unknown>";

/// Whether `key` can be written unquoted as a property name.
pub fn is_bare_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn property_key(key: &str) -> String {
    if is_bare_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Type expression for a tree, nested at `depth`.
pub fn tree_type(tree: &TokenTree, depth: usize) -> String {
    if tree.is_empty() {
        return EMPTY_RECORD.to_string();
    }
    let indent = "  ".repeat(depth + 1);
    let mut out = String::from("{\n");
    for (key, node) in tree.entries() {
        let ty = match node {
            TreeNode::Leaf(leaf) => format!(
                "TokenLeaf<{}, {}>",
                leaf.value.primitive_kind(),
                quote(&leaf.kind)
            ),
            TreeNode::Branch(child) => tree_type(child, depth + 1),
            TreeNode::Meta(_) => "unknown".to_string(),
        };
        let _ = writeln!(out, "{indent}{}: {ty};", property_key(key));
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
    out
}

/// Full declaration file: the leaf type, the mirrored `Tokens` type and a
/// typed default export.
pub fn type_description(tree: &TokenTree) -> String {
    let mut out = String::from(FILE_HEADER);
    out.push('\n');
    out.push_str(LEAF_TYPE);
    out.push('\n');
    let _ = writeln!(out, "export type Tokens = {};", tree_type(tree, 0));
    out.push('\n');
    out.push_str("declare const tokens: Tokens;\n");
    out.push_str("export default tokens;\n");
    out
}
