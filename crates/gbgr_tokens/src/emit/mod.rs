//! Artifact emission
//!
//! Turns the working trees into the files consumers import:
//!
//! - style sheets per [`Target`] (base, light, dark override) plus the
//!   `theme.css` / `index.css` aggregators
//! - the JSON dump of the merged source tree, under two names
//! - a TypeScript description of the tree's shape
//!
//! Targets, transforms and formats are plain values collected in an
//! [`EmitConfig`]; nothing is registered globally.

pub mod format;
pub mod resolve;
pub mod target;
pub mod transform;
pub mod types;

use std::path::{Path, PathBuf};

use crate::artifacts;
use crate::diff::ChangeSet;
use crate::error::Result;
use crate::tree::TokenTree;

pub use format::{variable_name, Declaration, Format};
pub use resolve::{Resolved, ResolveError, Resolver};
pub use target::{Target, TreeSource};
pub use transform::{TokenContext, ValueTransform};

/// Targets to emit, built once and handed to the [`Emitter`].
#[derive(Clone, Debug)]
pub struct EmitConfig {
    pub targets: Vec<Target>,
}

impl EmitConfig {
    /// Base, light and dark-override targets with the standard transforms.
    pub fn standard() -> Self {
        Self {
            targets: vec![target::base(), target::light(), target::dark()],
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Trees and change set one build emits from.
#[derive(Clone, Copy, Debug)]
pub struct EmitInput<'a> {
    /// Light merged with global
    pub source: &'a TokenTree,
    /// Dark merged with global
    pub dark: &'a TokenTree,
    pub changes: &'a ChangeSet,
}

/// A rendered output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

impl Artifact {
    fn new(file_name: &str, contents: String) -> Self {
        Self {
            file_name: file_name.to_string(),
            contents,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Emitter {
    config: EmitConfig,
}

impl Emitter {
    pub fn new(config: EmitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitConfig {
        &self.config
    }

    /// Declarations a target produces, in tree order.
    pub fn declarations(&self, target: &Target, input: &EmitInput<'_>) -> Vec<Declaration> {
        let tree = match target.source {
            TreeSource::Merged => input.source,
            TreeSource::Dark => input.dark,
        };
        let resolver = Resolver::new(tree);

        let mut out = Vec::new();
        for entry in tree.leaves() {
            if !(target.filter)(&entry.path, input.changes) {
                continue;
            }
            let dotted = entry.path.join(".");
            let value = match resolver.resolve(&entry.leaf.value) {
                Ok(Resolved::Json(_)) => {
                    tracing::debug!("{}: `{dotted}` has a structured value, not a variable", target.name);
                    continue;
                }
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("{}: `{dotted}`: {e}, emitting it unresolved", target.name);
                    Resolved::Text(entry.leaf.value.to_json().as_str().unwrap_or_default().to_string())
                }
            };
            let ctx = TokenContext {
                path: &entry.path,
                kind: &entry.leaf.kind,
            };
            let value = target
                .transforms
                .iter()
                .fold(value, |value, t| t.apply(&ctx, value));
            out.push(Declaration {
                name: variable_name(&entry.path),
                value: value.to_css(),
            });
        }
        out
    }

    /// Render every artifact without touching the file system.
    pub fn render(&self, input: &EmitInput<'_>) -> Result<Vec<Artifact>> {
        let mut files = Vec::new();

        let dump = serde_json::to_string_pretty(&input.source.to_json())
            .map_err(|e| crate::error::TokensError::json("token dump", e))?
            + "\n";
        files.push(Artifact::new(artifacts::TOKENS_JSON, dump.clone()));
        files.push(Artifact::new(artifacts::INPUT_JSON, dump));
        files.push(Artifact::new(
            artifacts::TYPES_DTS,
            types::type_description(input.source),
        ));

        for target in &self.config.targets {
            let declarations = self.declarations(target, input);
            tracing::info!(
                "{} -> {} ({} variables)",
                target.name,
                target.destination,
                declarations.len()
            );
            files.push(Artifact::new(
                target.destination,
                (target.format.render)(&declarations),
            ));
        }

        files.push(Artifact::new(
            artifacts::THEME_CSS,
            format::imports(&[artifacts::LIGHT_CSS, artifacts::DARK_CSS]),
        ));
        files.push(Artifact::new(
            artifacts::INDEX_CSS,
            format::imports(&[artifacts::BASE_CSS, artifacts::THEME_CSS]),
        ));
        Ok(files)
    }

    /// Render and write every artifact into `out_dir`.
    pub fn write(&self, input: &EmitInput<'_>, out_dir: &Path) -> Result<Vec<PathBuf>> {
        self.render(input)?
            .iter()
            .map(|a| artifacts::write_artifact(out_dir, &a.file_name, &a.contents))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_themes;
    use crate::tree::TokenLeaf;

    fn find<'a>(files: &'a [Artifact], name: &str) -> &'a str {
        &files
            .iter()
            .find(|a| a.file_name == name)
            .unwrap_or_else(|| panic!("{name} not rendered"))
            .contents
    }

    #[test]
    fn unresolved_references_are_kept_verbatim() {
        let source = TokenTree::new().with_branch(
            "color",
            TokenTree::new().with_leaf("a", TokenLeaf::new("{color.missing}", "color")),
        );
        let changes = ChangeSet::new();
        let input = EmitInput {
            source: &source,
            dark: &source,
            changes: &changes,
        };
        let emitter = Emitter::default();
        let decls = emitter.declarations(&target::light(), &input);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].value, "{color.missing}");
    }

    #[test]
    fn structured_values_are_not_variables() {
        let source = TokenTree::new().with_branch(
            "typography",
            TokenTree::new().with_leaf(
                "h1",
                TokenLeaf::new(serde_json::json!({ "fontSize": 32 }), "typography"),
            ),
        );
        let changes = ChangeSet::new();
        let input = EmitInput {
            source: &source,
            dark: &source,
            changes: &changes,
        };
        let files = Emitter::default().render(&input).unwrap();
        assert!(!find(&files, artifacts::LIGHT_CSS).contains("--typography-h1"));
        assert!(find(&files, artifacts::TOKENS_JSON).contains("\"fontSize\": 32"));
    }

    #[test]
    fn references_resolve_and_transform() {
        let source = TokenTree::new()
            .with_branch(
                "spacing",
                TokenTree::new()
                    .with_leaf("base", TokenLeaf::new(8, "number"))
                    .with_leaf("md", TokenLeaf::new("{spacing.base}", "number")),
            )
            .with_branch(
                "fontWeights",
                TokenTree::new().with_leaf("strong", TokenLeaf::new("Bold", "text")),
            );
        let changes = diff_themes(&source, &source);
        let input = EmitInput {
            source: &source,
            dark: &source,
            changes: &changes,
        };
        let files = Emitter::default().render(&input).unwrap();
        let base = find(&files, artifacts::BASE_CSS);
        assert!(base.contains("  --spacing-base: 8px;\n"));
        assert!(base.contains("  --spacing-md: 8px;\n"));
        assert!(base.contains("  --font-weights-strong: 700;\n"));
    }

    #[test]
    fn renders_every_artifact() {
        let source = TokenTree::new();
        let changes = ChangeSet::new();
        let input = EmitInput {
            source: &source,
            dark: &source,
            changes: &changes,
        };
        let files = Emitter::default().render(&input).unwrap();
        let mut names: Vec<_> = files.iter().map(|a| a.file_name.as_str()).collect();
        names.sort_unstable();
        let mut expected = artifacts::ALL.to_vec();
        expected.sort_unstable();
        assert_eq!(names, expected);
        assert_eq!(find(&files, artifacts::TOKENS_JSON), find(&files, artifacts::INPUT_JSON));
    }
}
