//! Token pipeline configuration file handling

use anyhow::{Context, Result};
use gbgr_tokens::{BuildOptions, SetNames};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "gbgr-tokens.toml";

/// Top-level configuration (gbgr-tokens.toml)
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct TokensConfig {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub sets: SetsConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Build configuration
#[derive(Debug, Deserialize, PartialEq)]
pub struct BuildConfig {
    /// Design tool export to read
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Output directory for generated artifacts
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_input() -> PathBuf {
    PathBuf::from("src/tokens-studio.json")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            out_dir: default_out_dir(),
        }
    }
}

/// Compound names of the token sets a build reads
#[derive(Debug, Deserialize, PartialEq)]
pub struct SetsConfig {
    #[serde(default = "default_global")]
    pub global: String,
    #[serde(default = "default_light")]
    pub light: String,
    #[serde(default = "default_dark")]
    pub dark: String,
}

fn default_global() -> String {
    SetNames::default().global
}

fn default_light() -> String {
    SetNames::default().light
}

fn default_dark() -> String {
    SetNames::default().dark
}

impl Default for SetsConfig {
    fn default() -> Self {
        let SetNames { global, light, dark } = SetNames::default();
        Self { global, light, dark }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct NormalizeConfig {
    /// Where `normalize` writes when no output is given
    #[serde(default = "default_normalized")]
    pub output: PathBuf,
}

fn default_normalized() -> PathBuf {
    PathBuf::from("src/tokens.normalized.json")
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            output: default_normalized(),
        }
    }
}

/// Watch mode configuration
#[derive(Debug, Deserialize, PartialEq)]
pub struct WatchConfig {
    /// Quiet period after the last change before rebuilding
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl TokensConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `gbgr-tokens.toml` in the
    /// working directory is used when present and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_file(path)
                } else {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file {} not found", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn set_names(&self) -> SetNames {
        SetNames {
            global: self.sets.global.clone(),
            light: self.sets.light.clone(),
            dark: self.sets.dark.clone(),
        }
    }

    /// Build options with command line overrides applied
    pub fn build_options(&self, input: Option<PathBuf>, out_dir: Option<PathBuf>) -> BuildOptions {
        BuildOptions {
            input: input.unwrap_or_else(|| self.build.input.clone()),
            out_dir: out_dir.unwrap_or_else(|| self.build.out_dir.clone()),
            sets: self.set_names(),
        }
    }
}
