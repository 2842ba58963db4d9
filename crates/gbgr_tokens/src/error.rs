//! Pipeline error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, building or writing token artifacts.
///
/// Validation findings are not errors of this kind; they are collected into a
/// [`ValidationReport`](crate::validate::ValidationReport) instead.
#[derive(Error, Debug)]
pub enum TokensError {
    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document is not valid JSON
    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but does not have the expected shape
    #[error("malformed input: {0}")]
    InputMalformed(String),
}

impl TokensError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            origin: origin.into(),
            source,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, TokensError>;
