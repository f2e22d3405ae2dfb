//! Placeholder resolution engine
//!
//! Resolves parsed segments against a [`PlaceholderResolver`]. Resolved
//! values are parsed again so placeholders inside them are expanded too;
//! keys currently being expanded are tracked to report circular references.

use std::collections::HashSet;

use stencil_domain::placeholder::{
    NestedPlaceholder, PlaceholderResolutionError, PlaceholderSyntax, Segment, SimplePlaceholder,
    is_text_only,
};

use super::parser::parse;
#[cfg(doc)]
use super::parser::MAX_NESTING_DEPTH;
use crate::ports::PlaceholderResolver;

type ResolutionResult<T> = Result<T, PlaceholderResolutionError>;

/// Replaces placeholders in text with values from a resolver.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use stencil_application::placeholder::PlaceholderHelper;
/// use stencil_domain::placeholder::PlaceholderSyntax;
///
/// let helper = PlaceholderHelper::new(PlaceholderSyntax::standard());
/// let values = HashMap::from([("host".to_string(), "localhost".to_string())]);
///
/// let result = helper.replace_placeholders("http://${host}:${port:8080}", &values);
/// assert_eq!(result.unwrap(), "http://localhost:8080");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaceholderHelper {
    syntax: PlaceholderSyntax,
}

impl PlaceholderHelper {
    /// Creates a helper for the given syntax.
    #[must_use]
    pub const fn new(syntax: PlaceholderSyntax) -> Self {
        Self { syntax }
    }

    /// Returns the syntax this helper parses.
    #[must_use]
    pub const fn syntax(&self) -> &PlaceholderSyntax {
        &self.syntax
    }

    /// Parses text into segments without resolving anything.
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<Segment> {
        parse(&self.syntax, text)
    }

    /// Replaces every placeholder in `text`, using the configured policy for
    /// unresolvable placeholders.
    ///
    /// Placeholders nested deeper than [`MAX_NESTING_DEPTH`] are treated as
    /// literal text. Chains of values referring to further keys are bounded
    /// only by the number of distinct keys the resolver answers for.
    ///
    /// # Errors
    ///
    /// Returns an error on a circular reference, or on an unresolvable
    /// placeholder when unresolvable placeholders are not ignored.
    pub fn replace_placeholders<R>(&self, text: &str, resolver: &R) -> ResolutionResult<String>
    where
        R: PlaceholderResolver + ?Sized,
    {
        self.replace_placeholders_with(text, resolver, None)
    }

    /// Replaces every placeholder in `text`. `ignore_unresolvable` overrides
    /// the configured policy for this call when set.
    ///
    /// # Errors
    ///
    /// Returns an error on a circular reference, or on an unresolvable
    /// placeholder when unresolvable placeholders are not ignored.
    pub fn replace_placeholders_with<R>(
        &self,
        text: &str,
        resolver: &R,
        ignore_unresolvable: Option<bool>,
    ) -> ResolutionResult<String>
    where
        R: PlaceholderResolver + ?Sized,
    {
        let segments = parse(&self.syntax, text);
        let mut context = ResolutionContext {
            syntax: &self.syntax,
            resolver,
            ignore_unresolvable: ignore_unresolvable
                .unwrap_or_else(|| self.syntax.ignore_unresolvable()),
            visited: HashSet::new(),
        };
        context.resolve_segments(&segments, Some(text))
    }
}

/// State of one `replace_placeholders` call.
struct ResolutionContext<'a, R: ?Sized> {
    syntax: &'a PlaceholderSyntax,
    resolver: &'a R,
    ignore_unresolvable: bool,
    /// Keys whose values are being expanded further up the current chain.
    visited: HashSet<String>,
}

impl<R> ResolutionContext<'_, R>
where
    R: PlaceholderResolver + ?Sized,
{
    /// Resolves and concatenates `segments`. Errors are extended with
    /// `value`, the text the segments were parsed from, when given.
    fn resolve_segments(
        &mut self,
        segments: &[Segment],
        value: Option<&str>,
    ) -> ResolutionResult<String> {
        let mut result = String::new();
        for segment in segments {
            match self.resolve_segment(segment) {
                Ok(resolved) => result.push_str(&resolved),
                Err(error) => {
                    return Err(match value {
                        Some(value) => error.with_value(value),
                        None => error,
                    });
                }
            }
        }
        Ok(result)
    }

    fn resolve_segment(&mut self, segment: &Segment) -> ResolutionResult<String> {
        match segment {
            Segment::Literal(text) => Ok(text.clone()),
            Segment::Simple(simple) => self.resolve_simple(simple),
            Segment::Nested(nested) => self.resolve_nested(nested),
        }
    }

    fn resolve_simple(&mut self, placeholder: &SimplePlaceholder) -> ResolutionResult<String> {
        // The whole body wins over the split key, so keys containing the
        // separator stay reachable.
        if placeholder.text != placeholder.key
            && let Some(value) = self.resolve_recursively(&placeholder.text)?
        {
            return Ok(value);
        }
        if let Some(value) = self.resolve_recursively(&placeholder.key)? {
            return Ok(value);
        }
        if let Some(fallback) = &placeholder.fallback {
            return Ok(fallback.clone());
        }
        self.handle_unresolvable(&placeholder.key, &placeholder.text)
    }

    fn resolve_nested(&mut self, placeholder: &NestedPlaceholder) -> ResolutionResult<String> {
        let key = self.resolve_segments(&placeholder.key, None)?;
        if let Some(value) = self.resolve_recursively(&key)? {
            return Ok(value);
        }
        if let Some(default) = &placeholder.default {
            return self.resolve_segments(default, None);
        }
        self.handle_unresolvable(&key, &placeholder.text)
    }

    /// Looks `key` up and fully expands the value. `Ok(None)` means the
    /// resolver has no value for `key`.
    fn resolve_recursively(&mut self, key: &str) -> ResolutionResult<Option<String>> {
        let Some(value) = self.resolver.resolve_placeholder(key) else {
            tracing::trace!(key, "placeholder not found");
            return Ok(None);
        };

        if !self.visited.insert(key.to_string()) {
            tracing::debug!(key, "circular placeholder reference");
            return Err(PlaceholderResolutionError::circular(key));
        }

        let segments = parse(self.syntax, &value);
        let expanded = if is_text_only(&segments) {
            Ok(segments.iter().map(Segment::text).collect())
        } else {
            self.resolve_segments(&segments, Some(value.as_str()))
        };
        self.visited.remove(key);

        tracing::trace!(key, "placeholder resolved");
        expanded.map(Some)
    }

    fn handle_unresolvable(&self, key: &str, text: &str) -> ResolutionResult<String> {
        if self.ignore_unresolvable {
            return Ok(self.syntax.wrap(key));
        }

        let error = PlaceholderResolutionError::unresolvable(key);
        if key == text {
            Err(error)
        } else {
            Err(error.with_value(self.syntax.wrap(key)))
        }
    }
}
