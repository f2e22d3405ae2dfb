//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The placeholder delimiter configuration is invalid.
    #[error("invalid placeholder syntax: {0}")]
    InvalidSyntax(String),

    /// A profile name was rejected.
    #[error("{0}")]
    InvalidProfile(String),

    /// A property source was asked to enumerate its names but cannot.
    #[error("Failed to enumerate property names due to non-enumerable property source: {0}")]
    NonEnumerableSource(String),

    /// A property source referenced by name does not exist.
    #[error("property source '{0}' does not exist")]
    SourceNotFound(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
