//! Property source loading errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a property source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying IO error.
        source: io::Error,
    },

    /// The file content is not valid for its format.
    #[error("failed to parse '{}': {reason}", path.display())]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The file extension does not name a supported format.
    #[error("unsupported property file format: '{}'", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl SourceError {
    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for property source loading.
pub type SourceResult<T> = Result<T, SourceError>;
