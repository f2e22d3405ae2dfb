//! Placeholder resolution failures.

use std::fmt;

use thiserror::Error;

/// Why a placeholder could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionErrorKind {
    /// No value exists for the key and no default was given.
    Unresolvable,
    /// The key is already being expanded further up the same chain.
    Circular,
}

/// Error raised when placeholder resolution fails.
///
/// Carries the offending key and the chain of values that were being
/// expanded when the failure happened, innermost first.
///
/// # Example
///
/// ```
/// use stencil_domain::placeholder::PlaceholderResolutionError;
///
/// let error = PlaceholderResolutionError::circular("a")
///     .with_value("${a}")
///     .with_value("x=${a}");
/// assert_eq!(
///     error.to_string(),
///     r#"Circular placeholder reference 'a' in value "${a}" <-- "x=${a}""#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.kind, .placeholder, .values))]
pub struct PlaceholderResolutionError {
    kind: ResolutionErrorKind,
    placeholder: String,
    values: Vec<String>,
}

impl PlaceholderResolutionError {
    /// Creates an error for a placeholder that cannot be resolved.
    #[must_use]
    pub fn unresolvable(placeholder: impl Into<String>) -> Self {
        Self {
            kind: ResolutionErrorKind::Unresolvable,
            placeholder: placeholder.into(),
            values: Vec::new(),
        }
    }

    /// Creates an error for a circular placeholder reference.
    #[must_use]
    pub fn circular(placeholder: impl Into<String>) -> Self {
        Self {
            kind: ResolutionErrorKind::Circular,
            placeholder: placeholder.into(),
            values: Vec::new(),
        }
    }

    /// Returns the error with `value` appended to the value chain.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Returns the kind of failure.
    #[must_use]
    pub const fn kind(&self) -> ResolutionErrorKind {
        self.kind
    }

    /// Returns the offending key.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Returns the value chain, innermost first.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the message without the value chain.
    #[must_use]
    pub fn reason(&self) -> String {
        Reason(self.kind, &self.placeholder).to_string()
    }
}

struct Reason<'a>(ResolutionErrorKind, &'a str);

impl fmt::Display for Reason<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ResolutionErrorKind::Unresolvable => {
                write!(f, "Could not resolve placeholder '{}'", self.1)
            }
            ResolutionErrorKind::Circular => {
                write!(f, "Circular placeholder reference '{}'", self.1)
            }
        }
    }
}

fn render(kind: &ResolutionErrorKind, placeholder: &str, values: &[String]) -> String {
    let reason = Reason(*kind, placeholder);
    if values.is_empty() {
        return reason.to_string();
    }

    let chain = values
        .iter()
        .map(|value| format!("\"{value}\""))
        .collect::<Vec<_>>()
        .join(" <-- ");
    format!("{reason} in value {chain}")
}
