//! Emission targets: which tokens go into which style sheet

use super::format::{css_dark_override, css_variables, Format};
use super::transform::{standard_transforms, ValueTransform};
use crate::artifacts;
use crate::diff::ChangeSet;

/// Tree a target reads its tokens from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeSource {
    /// Light merged with global
    Merged,
    /// Dark merged with global
    Dark,
}

/// One output style sheet with its inclusion filter, transforms and format.
#[derive(Clone)]
pub struct Target {
    pub name: &'static str,
    pub destination: &'static str,
    pub source: TreeSource,
    pub filter: fn(&[String], &ChangeSet) -> bool,
    pub transforms: Vec<ValueTransform>,
    pub format: Format,
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("destination", &self.destination)
            .field("source", &self.source)
            .field("transforms", &self.transforms)
            .field("format", &self.format)
            .finish()
    }
}

/// Whether a token belongs in the theme-independent base sheet: global
/// colors, every `font*` category, radius, spacing and device-mode.
pub fn is_base_path<S: AsRef<str>>(path: &[S]) -> bool {
    match path {
        [first, second, ..] if first.as_ref() == "color" && second.as_ref() == "global" => true,
        [first, ..] => {
            let first = first.as_ref();
            first.starts_with("font") || matches!(first, "radius" | "spacing" | "device-mode")
        }
        [] => false,
    }
}

pub fn base() -> Target {
    Target {
        name: "base",
        destination: artifacts::BASE_CSS,
        source: TreeSource::Merged,
        filter: |path, _| is_base_path(path),
        transforms: standard_transforms(),
        format: css_variables(),
    }
}

pub fn light() -> Target {
    Target {
        name: "light",
        destination: artifacts::LIGHT_CSS,
        source: TreeSource::Merged,
        filter: |path, _| !is_base_path(path),
        transforms: standard_transforms(),
        format: css_variables(),
    }
}

/// Only theme tokens whose dark value differs from light.
pub fn dark() -> Target {
    Target {
        name: "dark",
        destination: artifacts::DARK_CSS,
        source: TreeSource::Dark,
        filter: |path, changes| !is_base_path(path) && changes.contains(path),
        transforms: standard_transforms(),
        format: css_dark_override(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(dotted: &str) -> Vec<String> {
        dotted.split('.').map(str::to_string).collect()
    }

    #[test]
    fn base_and_theme_partition() {
        for p in [
            "color.global.white",
            "fontSize.body",
            "fontWeights.bold",
            "fontFamilies.sans",
            "radius.md",
            "spacing.sm",
            "device-mode.mobile",
        ] {
            assert!(is_base_path(&path(p)), "{p} should be base");
        }
        for p in ["color.semantic.brand", "color.brand", "shadow.sm", "opacity.disabled"] {
            assert!(!is_base_path(&path(p)), "{p} should be themed");
        }
    }

    #[test]
    fn each_path_lands_in_exactly_one_of_base_or_light() {
        let changes = ChangeSet::new();
        let (base, light) = (base(), light());
        for p in ["color.global.a", "color.brand", "spacing.sm", "misc"] {
            let p = path(p);
            assert!((base.filter)(&p, &changes) ^ (light.filter)(&p, &changes));
        }
    }

    #[test]
    fn dark_requires_change_membership() {
        let mut changes = ChangeSet::new();
        changes.insert(&["color", "brand"]);
        let dark = dark();
        assert!((dark.filter)(&path("color.brand"), &changes));
        assert!(!(dark.filter)(&path("color.bg"), &changes));
    }
}
