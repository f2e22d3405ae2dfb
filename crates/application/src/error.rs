//! Application error types

use stencil_domain::{DomainError, PlaceholderResolutionError};
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Placeholder resolution failed.
    #[error(transparent)]
    Resolution(#[from] PlaceholderResolutionError),

    /// A required property has no value.
    #[error("Required key '{0}' not found")]
    PropertyNotFound(String),

    /// Properties declared as required could not be resolved.
    #[error(
        "The following properties were declared as required but could not be resolved: {0:?}"
    )]
    MissingRequiredProperties(Vec<String>),

    /// A property value could not be converted to the requested type.
    #[error("Cannot convert value '{value}' of property '{key}': {reason}")]
    Conversion {
        /// The property key.
        key: String,
        /// The raw value.
        value: String,
        /// Why the conversion failed.
        reason: String,
    },
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages() {
        assert_eq!(
            ApplicationError::MissingRequiredProperties(vec!["a".into(), "b".into()]).to_string(),
            r#"The following properties were declared as required but could not be resolved: ["a", "b"]"#
        );
        assert_eq!(
            ApplicationError::from(PlaceholderResolutionError::unresolvable("x")).to_string(),
            "Could not resolve placeholder 'x'"
        );
        assert_eq!(
            ApplicationError::PropertyNotFound("db.url".into()).to_string(),
            "Required key 'db.url' not found"
        );
    }
}
