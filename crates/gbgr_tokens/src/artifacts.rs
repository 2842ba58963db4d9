//! Output file names and writing

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TokensError};

pub const BASE_CSS: &str = "tokens.base.css";
pub const LIGHT_CSS: &str = "theme.light.css";
pub const DARK_CSS: &str = "theme.dark.css";
pub const THEME_CSS: &str = "theme.css";
pub const INDEX_CSS: &str = "index.css";

/// Nested JSON dump read by the component library and docs site
pub const TOKENS_JSON: &str = "tokens.json";
/// Same content, the "input" dump the validator reads
pub const INPUT_JSON: &str = "sd.input.json";
pub const TYPES_DTS: &str = "tokens.d.ts";

/// Every file a build writes.
pub const ALL: &[&str] = &[
    BASE_CSS,
    LIGHT_CSS,
    DARK_CSS,
    THEME_CSS,
    INDEX_CSS,
    TOKENS_JSON,
    INPUT_JSON,
    TYPES_DTS,
];

/// Write `contents` to `dir/name`, creating `dir` if needed.
///
/// The data goes to a sibling temporary file first and is then renamed over
/// the destination, so a successful call never leaves a half-written file.
pub fn write_artifact(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| TokensError::io(dir, e))?;
    let dest = dir.join(name);
    let tmp = dir.join(format!(".{name}.tmp"));
    fs::write(&tmp, contents).map_err(|e| TokensError::io(&tmp, e))?;
    fs::rename(&tmp, &dest).map_err(|e| TokensError::io(&dest, e))?;
    tracing::debug!("wrote {}", dest.display());
    Ok(dest)
}
