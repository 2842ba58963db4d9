//! End-to-end build: load, merge, diff, emit

use std::path::{Path, PathBuf};

use crate::artifacts::write_artifact;
use crate::diff::{diff_themes, ChangeSet};
use crate::emit::{EmitConfig, EmitInput, Emitter};
use crate::error::{Result, TokensError};
use crate::loader::Export;
use crate::tree::TokenTree;

/// Compound names of the sets a build reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetNames {
    pub global: String,
    pub light: String,
    pub dark: String,
}

impl Default for SetNames {
    fn default() -> Self {
        Self {
            global: "global/global".to_string(),
            light: "Primitives/light".to_string(),
            dark: "Primitives/dark".to_string(),
        }
    }
}

/// Where a build reads from and writes to.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub sets: SetNames,
}

/// Working trees derived from one export.
#[derive(Clone, Debug, Default)]
pub struct Prepared {
    /// Light with global merged over it
    pub source: TokenTree,
    /// Dark with global merged over it
    pub dark: TokenTree,
    /// Paths where dark overrides light
    pub changes: ChangeSet,
}

impl Prepared {
    pub fn emit_input(&self) -> EmitInput<'_> {
        EmitInput {
            source: &self.source,
            dark: &self.dark,
            changes: &self.changes,
        }
    }
}

/// Pick the global/light/dark sets and derive the working trees.
pub fn prepare(export: &Export, sets: &SetNames) -> Prepared {
    let global = export.tree_or_empty(&sets.global);
    let light = export.tree_or_empty(&sets.light);
    let dark = export.tree_or_empty(&sets.dark);

    let changes = diff_themes(&light, &dark);
    tracing::info!("found {} differences for dark theme", changes.len());

    Prepared {
        source: TokenTree::overlay(&light, &global),
        dark: TokenTree::overlay(&dark, &global),
        changes,
    }
}

/// What a build produced.
#[derive(Clone, Debug)]
pub struct BuildSummary {
    pub token_count: usize,
    pub changed: usize,
    pub written: Vec<PathBuf>,
}

/// Run one full build. Every artifact is regenerated from scratch.
pub fn build(options: &BuildOptions, config: &EmitConfig) -> Result<BuildSummary> {
    tracing::info!("loading {}", options.input.display());
    let export = Export::from_path(&options.input)?;

    let prepared = prepare(&export, &options.sets);
    let written = Emitter::new(config.clone()).write(&prepared.emit_input(), &options.out_dir)?;

    let summary = BuildSummary {
        token_count: prepared.source.leaf_count(),
        changed: prepared.changes.len(),
        written,
    };
    tracing::info!(
        "build complete: {} tokens, {} files in {}",
        summary.token_count,
        summary.written.len(),
        options.out_dir.display()
    );
    Ok(summary)
}

/// Rewrite an export as `collections[<collection>][<mode>]` with normalized
/// keys and references.
pub fn normalize_file(input: &Path, output: &Path) -> Result<()> {
    let export = Export::from_path(input)?;
    let doc = serde_json::to_string_pretty(&export.to_normalized_document())
        .map_err(|e| TokensError::json(output.display().to_string(), e))?
        + "\n";

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = output
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| TokensError::InputMalformed(format!("invalid output path {}", output.display())))?;
    write_artifact(dir, name, &doc)?;
    tracing::info!("[normalize] {} -> {}", input.display(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prepare_merges_global_over_each_theme() {
        let export = Export::from_value(&json!({
            "global/global": {
                "color": { "global": { "white": { "value": "#FFFFFF", "type": "color" } } }
            },
            "Primitives/light": {
                "color": { "bg": { "value": "{color.global.white}", "type": "color" } }
            },
            "Primitives/dark": {
                "color": { "bg": { "value": "#111111", "type": "color" } }
            }
        }))
        .unwrap();

        let prepared = prepare(&export, &SetNames::default());
        assert!(prepared.source.leaf_at(&["color", "global", "white"]).is_some());
        assert!(prepared.source.leaf_at(&["color", "bg"]).is_some());
        assert!(prepared.dark.leaf_at(&["color", "global", "white"]).is_some());
        assert!(prepared.changes.contains(&["color", "bg"]));
    }

    #[test]
    fn missing_sets_build_from_empty_trees() {
        let export = Export::from_value(&json!({})).unwrap();
        let prepared = prepare(&export, &SetNames::default());
        assert!(prepared.source.is_empty());
        assert!(prepared.changes.is_empty());
    }
}
