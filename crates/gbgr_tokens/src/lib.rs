//! gbgr design token pipeline
//!
//! Turns a design-tool token export into the artifacts the component library
//! and documentation site consume.
//!
//! # Overview
//!
//! ```text
//! export.json ──► loader ──► normalize / reference rewrite (per set)
//!                    │
//!                    ├─► tree::merge   light ⊕ global  ──► source tree
//!                    ├─► diff          light vs dark   ──► ChangeSet
//!                    └─► emit          base / light / dark-override CSS,
//!                                      theme.css + index.css, JSON dump,
//!                                      tokens.d.ts
//!
//! dist/ ──► validate (separate pass over the emitted JSON)
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gbgr_tokens::{build, BuildOptions, EmitConfig, SetNames};
//!
//! let summary = build(
//!     &BuildOptions {
//!         input: "src/tokens-studio.json".into(),
//!         out_dir: "dist".into(),
//!         sets: SetNames::default(),
//!     },
//!     &EmitConfig::standard(),
//! )?;
//!
//! let report = gbgr_tokens::validate::validate_dir("dist".as_ref())?;
//! assert!(report.is_ok());
//! ```

pub mod artifacts;
pub mod diff;
pub mod emit;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod reference;
pub mod tree;
pub mod validate;

// Re-export commonly used types
pub use diff::{diff_themes, ChangeSet};
pub use emit::{EmitConfig, EmitInput, Emitter};
pub use error::{Result, TokensError};
pub use loader::{parse_set_key, Export, TokenSet};
pub use normalize::{normalize_collection_name, normalize_key, normalize_mode_name};
pub use pipeline::{build, normalize_file, prepare, BuildOptions, BuildSummary, Prepared, SetNames};
pub use reference::rewrite_references;
pub use tree::{Literal, TokenLeaf, TokenTree, TokenValue, TreeNode};
pub use validate::{ValidationError, ValidationReport};
