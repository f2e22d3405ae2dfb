//! Parsed pieces of a placeholder template.

/// One piece of parsed text.
///
/// Segments form an owned tree: a [`NestedPlaceholder`] owns the segments
/// of its key and default expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text emitted verbatim.
    Literal(String),
    /// A placeholder without nested placeholders in its body.
    Simple(SimplePlaceholder),
    /// A placeholder whose body contains further placeholders.
    Nested(NestedPlaceholder),
}

impl Segment {
    /// Creates a literal segment.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Returns the raw text of this segment: the literal text, or the body
    /// of a placeholder without its delimiters.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Literal(text) => text,
            Self::Simple(simple) => &simple.text,
            Self::Nested(nested) => &nested.text,
        }
    }

    /// Returns true if this is a literal segment.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// Returns true if every segment is a literal.
#[must_use]
pub fn is_text_only(segments: &[Segment]) -> bool {
    segments.iter().all(Segment::is_literal)
}

/// A placeholder such as `${name}` or `${name:fallback}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplePlaceholder {
    /// The body between the delimiters.
    pub text: String,
    /// The lookup key, with escaped separators unescaped.
    pub key: String,
    /// Text after the first unescaped separator, used verbatim when the key
    /// cannot be resolved.
    pub fallback: Option<String>,
}

impl SimplePlaceholder {
    /// Creates a simple placeholder.
    #[must_use]
    pub fn new(text: impl Into<String>, key: impl Into<String>, fallback: Option<String>) -> Self {
        Self {
            text: text.into(),
            key: key.into(),
            fallback,
        }
    }
}

/// A placeholder such as `${a${b}}` or `${a:${b}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedPlaceholder {
    /// The body between the delimiters.
    pub text: String,
    /// Segments that resolve to the lookup key.
    pub key: Vec<Segment>,
    /// Segments resolved when the key cannot be resolved.
    pub default: Option<Vec<Segment>>,
}

impl NestedPlaceholder {
    /// Creates a nested placeholder.
    #[must_use]
    pub fn new(text: impl Into<String>, key: Vec<Segment>, default: Option<Vec<Segment>>) -> Self {
        Self {
            text: text.into(),
            key,
            default,
        }
    }
}

impl From<SimplePlaceholder> for Segment {
    fn from(value: SimplePlaceholder) -> Self {
        Self::Simple(value)
    }
}

impl From<NestedPlaceholder> for Segment {
    fn from(value: NestedPlaceholder) -> Self {
        Self::Nested(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_of_each_variant() {
        assert_eq!(Segment::literal("abc").text(), "abc");
        assert_eq!(
            Segment::from(SimplePlaceholder::new("a:b", "a", Some("b".into()))).text(),
            "a:b"
        );
        assert_eq!(
            Segment::from(NestedPlaceholder::new("a${b}", vec![], None)).text(),
            "a${b}"
        );
    }

    #[test]
    fn test_is_text_only() {
        assert!(is_text_only(&[]));
        assert!(is_text_only(&[Segment::literal("x")]));
        assert!(!is_text_only(&[
            Segment::literal("x"),
            SimplePlaceholder::new("y", "y", None).into(),
        ]));
    }
}
