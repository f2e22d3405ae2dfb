//! Delimiter and escape configuration for placeholders.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Closing suffixes whose opener may stand in for the full prefix when
/// counting nesting depth, as `(suffix, opener)` pairs.
///
/// The parenthesis entry is inverted relative to the other two: it maps a
/// `(` suffix to a `)` opener. It is kept as-is so that `(`/`)` delimited
/// configurations behave exactly as they always have.
const WELL_KNOWN_SIMPLE_PREFIXES: &[(&str, &str)] = &[("}", "{"), ("]", "["), ("(", ")")];

/// Default prefix, `${`.
pub const DEFAULT_PREFIX: &str = "${";

/// Default suffix, `}`.
pub const DEFAULT_SUFFIX: &str = "}";

/// Default separator between a key and its default value, `:`.
pub const DEFAULT_SEPARATOR: &str = ":";

/// Default escape character, `\`.
pub const DEFAULT_ESCAPE: char = '\\';

/// Describes how placeholders are written inside text.
///
/// # Example
///
/// ```
/// use stencil_domain::placeholder::PlaceholderSyntax;
///
/// let syntax = PlaceholderSyntax::new("${", "}")
///     .unwrap()
///     .with_separator(":")
///     .unwrap()
///     .with_escape('\\');
///
/// assert_eq!(syntax.prefix(), "${");
/// assert_eq!(syntax.nesting_marker(), "{");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSyntax", into = "RawSyntax")]
pub struct PlaceholderSyntax {
    prefix: String,
    suffix: String,
    separator: Option<String>,
    escape: Option<char>,
    ignore_unresolvable: bool,
    nesting_marker: String,
}

impl PlaceholderSyntax {
    /// Creates a syntax with the given delimiters, no separator, no escape
    /// character, and unresolvable placeholders left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSyntax`] if either delimiter is empty.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> DomainResult<Self> {
        let prefix = prefix.into();
        let suffix = suffix.into();

        if prefix.is_empty() {
            return Err(DomainError::InvalidSyntax(
                "prefix must not be empty".to_string(),
            ));
        }
        if suffix.is_empty() {
            return Err(DomainError::InvalidSyntax(
                "suffix must not be empty".to_string(),
            ));
        }

        let nesting_marker = nesting_marker_for(&prefix, &suffix);
        Ok(Self {
            prefix,
            suffix,
            separator: None,
            escape: None,
            ignore_unresolvable: true,
            nesting_marker,
        })
    }

    /// The `${key:default}` syntax with `\` as escape character.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            separator: Some(DEFAULT_SEPARATOR.to_string()),
            escape: Some(DEFAULT_ESCAPE),
            ignore_unresolvable: true,
            nesting_marker: nesting_marker_for(DEFAULT_PREFIX, DEFAULT_SUFFIX),
        }
    }

    /// Sets the separator that introduces a default value.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSyntax`] if the separator is empty.
    pub fn with_separator(mut self, separator: impl Into<String>) -> DomainResult<Self> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(DomainError::InvalidSyntax(
                "separator must not be empty".to_string(),
            ));
        }
        self.separator = Some(separator);
        Ok(self)
    }

    /// Removes the separator, disabling default values.
    #[must_use]
    pub fn without_separator(mut self) -> Self {
        self.separator = None;
        self
    }

    /// Sets the escape character.
    #[must_use]
    pub const fn with_escape(mut self, escape: char) -> Self {
        self.escape = Some(escape);
        self
    }

    /// Removes the escape character.
    #[must_use]
    pub const fn without_escape(mut self) -> Self {
        self.escape = None;
        self
    }

    /// Sets whether unresolvable placeholders are kept verbatim (`true`) or
    /// reported as errors (`false`).
    #[must_use]
    pub const fn with_ignore_unresolvable(mut self, ignore: bool) -> Self {
        self.ignore_unresolvable = ignore;
        self
    }

    /// Returns the placeholder prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the placeholder suffix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns the default-value separator, if any.
    #[must_use]
    pub fn separator(&self) -> Option<&str> {
        self.separator.as_deref()
    }

    /// Returns the escape character, if any.
    #[must_use]
    pub const fn escape(&self) -> Option<char> {
        self.escape
    }

    /// Returns whether unresolvable placeholders are ignored by default.
    #[must_use]
    pub const fn ignore_unresolvable(&self) -> bool {
        self.ignore_unresolvable
    }

    /// Returns the marker that increases nesting depth while looking for a
    /// matching suffix. Equal to the prefix unless the prefix ends with the
    /// opener of a well-known single-character suffix.
    #[must_use]
    pub fn nesting_marker(&self) -> &str {
        &self.nesting_marker
    }

    /// Wraps `key` in the configured delimiters.
    #[must_use]
    pub fn wrap(&self, key: &str) -> String {
        format!("{}{key}{}", self.prefix, self.suffix)
    }
}

impl Default for PlaceholderSyntax {
    fn default() -> Self {
        Self::standard()
    }
}

fn nesting_marker_for(prefix: &str, suffix: &str) -> String {
    WELL_KNOWN_SIMPLE_PREFIXES
        .iter()
        .find(|(closing, _)| *closing == suffix)
        .filter(|(_, opener)| prefix.ends_with(opener))
        .map_or_else(|| prefix.to_string(), |(_, opener)| (*opener).to_string())
}

/// Serialized form of [`PlaceholderSyntax`], validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSyntax {
    #[serde(default = "default_prefix")]
    prefix: String,
    #[serde(default = "default_suffix")]
    suffix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    escape: Option<char>,
    #[serde(default = "default_ignore_unresolvable")]
    ignore_unresolvable_placeholders: bool,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

const fn default_ignore_unresolvable() -> bool {
    true
}

impl TryFrom<RawSyntax> for PlaceholderSyntax {
    type Error = DomainError;

    fn try_from(raw: RawSyntax) -> Result<Self, Self::Error> {
        let mut syntax = Self::new(raw.prefix, raw.suffix)?
            .with_ignore_unresolvable(raw.ignore_unresolvable_placeholders);
        if let Some(separator) = raw.separator {
            syntax = syntax.with_separator(separator)?;
        }
        if let Some(escape) = raw.escape {
            syntax = syntax.with_escape(escape);
        }
        Ok(syntax)
    }
}

impl From<PlaceholderSyntax> for RawSyntax {
    fn from(syntax: PlaceholderSyntax) -> Self {
        Self {
            prefix: syntax.prefix,
            suffix: syntax.suffix,
            separator: syntax.separator,
            escape: syntax.escape,
            ignore_unresolvable_placeholders: syntax.ignore_unresolvable,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_delimiters_are_rejected() {
        assert!(matches!(
            PlaceholderSyntax::new("", "}"),
            Err(DomainError::InvalidSyntax(_))
        ));
        assert!(matches!(
            PlaceholderSyntax::new("${", ""),
            Err(DomainError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_empty_separator_is_rejected() {
        let syntax = PlaceholderSyntax::new("${", "}").unwrap();
        assert!(syntax.with_separator("").is_err());
    }

    #[test]
    fn test_nesting_marker_degrades_for_braces_and_brackets() {
        assert_eq!(PlaceholderSyntax::new("${", "}").unwrap().nesting_marker(), "{");
        assert_eq!(PlaceholderSyntax::new("$[", "]").unwrap().nesting_marker(), "[");
        assert_eq!(PlaceholderSyntax::new("{{", "}").unwrap().nesting_marker(), "{");
    }

    #[test]
    fn test_nesting_marker_keeps_prefix_otherwise() {
        assert_eq!(PlaceholderSyntax::new("${", "}}").unwrap().nesting_marker(), "${");
        assert_eq!(PlaceholderSyntax::new("<%", "%>").unwrap().nesting_marker(), "<%");
        // Parenthesis entry is inverted: a `)` suffix does not degrade.
        assert_eq!(PlaceholderSyntax::new("$(", ")").unwrap().nesting_marker(), "$(");
        assert_eq!(PlaceholderSyntax::new("$)", "(").unwrap().nesting_marker(), ")");
    }

    #[test]
    fn test_standard_syntax() {
        let syntax = PlaceholderSyntax::standard();
        assert_eq!(syntax.prefix(), "${");
        assert_eq!(syntax.suffix(), "}");
        assert_eq!(syntax.separator(), Some(":"));
        assert_eq!(syntax.escape(), Some('\\'));
        assert!(syntax.ignore_unresolvable());
        assert_eq!(syntax.wrap("name"), "${name}");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let syntax: PlaceholderSyntax = serde_json::from_str(r#"{"separator": "?"}"#).unwrap();
        assert_eq!(syntax.prefix(), "${");
        assert_eq!(syntax.separator(), Some("?"));
        assert_eq!(syntax.escape(), None);
        assert!(syntax.ignore_unresolvable());
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<PlaceholderSyntax, _> = serde_json::from_str(r#"{"prefix": ""}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let syntax = PlaceholderSyntax::new("#{", "}")
            .unwrap()
            .with_escape('!')
            .with_ignore_unresolvable(false);
        let json = serde_json::to_string(&syntax).unwrap();
        let restored: PlaceholderSyntax = serde_json::from_str(&json).unwrap();
        assert_eq!(syntax, restored);
    }
}
