//! Light/dark theme comparison
//!
//! Produces the [`ChangeSet`] of leaf paths where the dark tree really
//! overrides the light one, so the dark style sheet only carries overrides.

use std::collections::BTreeSet;

use crate::tree::{TokenTree, TreeNode};

/// Separator used when a change-set entry is displayed as one string.
pub const PATH_SEPARATOR: &str = "-";

/// Leaf paths whose literal value differs between light and dark.
///
/// Paths are stored segment by segment; normalized keys contain hyphens, so
/// the joined form (`color-brand-primary`) is only used for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: BTreeSet<Vec<String>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display form of a path, segments joined with [`PATH_SEPARATOR`].
    pub fn key<S: AsRef<str>>(path: &[S]) -> String {
        path.iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR)
    }

    pub fn insert<S: AsRef<str>>(&mut self, path: &[S]) {
        self.paths
            .insert(path.iter().map(|s| s.as_ref().to_string()).collect());
    }

    pub fn contains<S: AsRef<str>>(&self, path: &[S]) -> bool {
        let path: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
        self.paths.contains(&path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Changed paths, segment by segment.
    pub fn paths(&self) -> impl Iterator<Item = &[String]> {
        self.paths.iter().map(Vec::as_slice)
    }

    /// Changed paths in display form.
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        self.paths.iter().map(|p| Self::key(p))
    }
}

/// Compare `light` against `dark`, walking light's keys.
///
/// Keys missing from dark are skipped, as are positions where one side is a
/// leaf and the other a group. Leaves are compared on their stored value, so
/// a reference and a literal differ whenever their text differs.
pub fn diff_themes(light: &TokenTree, dark: &TokenTree) -> ChangeSet {
    let mut changes = ChangeSet::new();
    walk(light, dark, &mut Vec::new(), &mut changes);
    changes
}

fn walk<'a>(light: &'a TokenTree, dark: &TokenTree, path: &mut Vec<&'a str>, out: &mut ChangeSet) {
    for (key, light_node) in light.iter() {
        let Some(dark_node) = dark.get(key) else {
            continue;
        };
        path.push(key);
        match (light_node, dark_node) {
            (TreeNode::Leaf(l), TreeNode::Leaf(d)) => {
                if !l.value.same_as(&d.value) {
                    out.insert(path.as_slice());
                }
            }
            (TreeNode::Branch(l), TreeNode::Branch(d)) => walk(l, d, path, out),
            _ => tracing::debug!(
                "`{}` is a token on one side and a group on the other, not compared",
                path.join(".")
            ),
        }
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TokenLeaf;

    fn color(value: &str) -> TokenLeaf {
        TokenLeaf::new(value, "color")
    }

    fn palette(brand: &str, bg: &str) -> TokenTree {
        TokenTree::new().with_branch(
            "color",
            TokenTree::new()
                .with_leaf("brand", color(brand))
                .with_leaf("bg", color(bg)),
        )
    }

    #[test]
    fn records_only_changed_leaves() {
        let changes = diff_themes(&palette("#FFFFFF", "#EEE"), &palette("#000000", "#EEE"));
        assert_eq!(changes.iter().collect::<Vec<_>>(), vec!["color-brand".to_string()]);
        assert!(changes.contains(&["color", "brand"]));
        assert!(!changes.contains(&["color", "bg"]));
    }

    #[test]
    fn paths_missing_from_dark_are_skipped() {
        let light = palette("#FFF", "#EEE").with_leaf("extra", color("#123"));
        let dark = TokenTree::new();
        assert!(diff_themes(&light, &dark).is_empty());
        assert!(diff_themes(&light, &palette("#FFF", "#EEE")).is_empty());
    }

    #[test]
    fn reference_and_literal_differ_by_text() {
        let light = TokenTree::new().with_leaf("a", color("{color.brand}"));
        let dark = TokenTree::new().with_leaf("a", color("#FFFFFF"));
        assert_eq!(diff_themes(&light, &dark).len(), 1);

        let same = TokenTree::new().with_leaf("a", color("{color.brand}"));
        assert!(diff_themes(&light, &same).is_empty());
    }

    #[test]
    fn shape_mismatch_is_not_a_change() {
        let light = TokenTree::new().with_leaf("a", color("#fff"));
        let dark = TokenTree::new().with_branch("a", TokenTree::new().with_leaf("b", color("#000")));
        assert!(diff_themes(&light, &dark).is_empty());
    }

    #[test]
    fn hyphenated_keys_do_not_alias_nested_paths() {
        let light = TokenTree::new().with_branch(
            "color",
            TokenTree::new().with_leaf("brand-primary", color("#FFFFFF")),
        );
        let dark = TokenTree::new().with_branch(
            "color",
            TokenTree::new().with_leaf("brand-primary", color("#000000")),
        );
        let changes = diff_themes(&light, &dark);
        assert!(changes.contains(&["color", "brand-primary"]));
        assert!(!changes.contains(&["color-brand", "primary"]));
        assert!(!changes.contains(&["color", "brand", "primary"]));
        assert_eq!(changes.iter().collect::<Vec<_>>(), vec!["color-brand-primary".to_string()]);
    }
}
