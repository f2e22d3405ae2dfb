//! Segment parser for placeholder templates
//!
//! Splits text into literal and placeholder segments. Placeholders may nest,
//! carry a default after the separator, and be escaped with the escape
//! character. Unmatched delimiters are kept as literal text; parsing never
//! fails. Placeholders nested deeper than [`MAX_NESTING_DEPTH`] are kept as
//! literal text as well.

use stencil_domain::placeholder::{NestedPlaceholder, PlaceholderSyntax, Segment, SimplePlaceholder};

/// Deepest placeholder nesting that is parsed; deeper placeholders stay
/// literal text inside their enclosing placeholder.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parses top-level text into segments.
///
/// # Examples
///
/// ```
/// use stencil_application::placeholder::parser::parse;
/// use stencil_domain::placeholder::{PlaceholderSyntax, Segment};
///
/// let segments = parse(&PlaceholderSyntax::standard(), "host=${host:localhost}");
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0], Segment::literal("host="));
/// assert_eq!(segments[1].text(), "host:localhost");
/// ```
#[must_use]
pub fn parse(syntax: &PlaceholderSyntax, text: &str) -> Vec<Segment> {
    parse_segments(syntax, text, 0)
}

/// Parses `value`; at a non-zero `depth`, `value` is the body of a
/// placeholder and exactly one placeholder segment is returned.
fn parse_segments(syntax: &PlaceholderSyntax, value: &str, depth: usize) -> Vec<Segment> {
    let in_placeholder = depth > 0;
    let prefix = syntax.prefix();
    let Some(mut start) = value.find(prefix) else {
        if in_placeholder {
            let (key, fallback) = split_default(syntax, value);
            return vec![SimplePlaceholder::new(value, key, fallback).into()];
        }
        if value.is_empty() {
            return Vec::new();
        }
        return vec![Segment::literal(value)];
    };

    let mut segments = Vec::new();
    let mut position = 0;
    loop {
        let end = matching_suffix(syntax, value, start);
        let next_position = match (end, escape_start(syntax, value, start)) {
            (None, _) => {
                let after_prefix = start + prefix.len();
                push_text(&mut segments, value, position, after_prefix);
                after_prefix
            }
            (Some(_), Some(escape)) => {
                push_text(&mut segments, value, position, escape);
                let after_prefix = start + prefix.len();
                push_text(&mut segments, value, start, after_prefix);
                after_prefix
            }
            (Some(end), None) if depth >= MAX_NESTING_DEPTH => {
                let after_suffix = end + syntax.suffix().len();
                push_text(&mut segments, value, position, after_suffix);
                after_suffix
            }
            (Some(end), None) => {
                push_text(&mut segments, value, position, start);
                let body = &value[start + prefix.len()..end];
                segments.extend(parse_segments(syntax, body, depth + 1));
                end + syntax.suffix().len()
            }
        };

        position = next_position;
        match find_from(value, prefix, next_position) {
            Some(next) => start = next,
            None => break,
        }
    }

    push_text(&mut segments, value, position, value.len());
    if in_placeholder {
        vec![nested_placeholder(syntax, value, segments)]
    } else {
        segments
    }
}

/// Wraps the segments of a placeholder body, splitting them into key and
/// default at the first unescaped separator found in a literal segment.
fn nested_placeholder(syntax: &PlaceholderSyntax, text: &str, segments: Vec<Segment>) -> Segment {
    if syntax.separator().is_none() {
        return NestedPlaceholder::new(text, segments, None).into();
    }

    let mut key = Vec::new();
    let mut remaining = segments.into_iter();
    while let Some(segment) = remaining.next() {
        let Segment::Literal(literal) = segment else {
            key.push(segment);
            continue;
        };

        let (key_text, fallback) = split_default(syntax, &literal);
        key.push(Segment::Literal(key_text));
        if let Some(fallback) = fallback {
            let mut default = vec![Segment::Literal(fallback)];
            default.extend(remaining);
            return NestedPlaceholder::new(text, key, Some(default)).into();
        }
    }

    NestedPlaceholder::new(text, key, None).into()
}

/// Returns the byte index of the suffix that closes the prefix found at
/// `start`, or `None` when the prefix is unmatched.
fn matching_suffix(syntax: &PlaceholderSyntax, value: &str, start: usize) -> Option<usize> {
    let bytes = value.as_bytes();
    let suffix = syntax.suffix().as_bytes();
    let marker = syntax.nesting_marker().as_bytes();

    // Needles are valid UTF-8, so a match can only start on a char boundary.
    let mut index = start + syntax.prefix().len();
    let mut depth = 0usize;
    while index < bytes.len() {
        let rest = &bytes[index..];
        if rest.starts_with(suffix) {
            if depth == 0 {
                return Some(index);
            }
            depth -= 1;
            index += suffix.len();
        } else if rest.starts_with(marker) {
            depth += 1;
            index += marker.len();
        } else {
            index += 1;
        }
    }
    None
}

/// Splits a placeholder body into key and default at the first unescaped
/// separator. Escaped separators stay in the key without their escape.
fn split_default(syntax: &PlaceholderSyntax, value: &str) -> (String, Option<String>) {
    let Some(separator) = syntax.separator() else {
        return (value.to_string(), None);
    };
    if !value.contains(separator) {
        return (value.to_string(), None);
    }

    let mut key = String::with_capacity(value.len());
    let mut position = 0;
    while let Some(index) = find_from(value, separator, position) {
        let Some(escape) = escape_start(syntax, value, index) else {
            key.push_str(&value[position..index]);
            let fallback = value[index + separator.len()..].to_string();
            return (key, Some(fallback));
        };

        if escape >= position {
            key.push_str(&value[position..escape]);
        }
        key.push_str(separator);
        position = index + separator.len();
    }

    key.push_str(&value[position..]);
    (key, None)
}

/// Returns the byte index of the escape character directly before `index`,
/// if the text at `index` is escaped.
fn escape_start(syntax: &PlaceholderSyntax, value: &str, index: usize) -> Option<usize> {
    let escape = syntax.escape()?;
    value[..index]
        .ends_with(escape)
        .then(|| index - escape.len_utf8())
}

fn find_from(value: &str, pattern: &str, from: usize) -> Option<usize> {
    value[from..].find(pattern).map(|index| index + from)
}

/// Appends `value[start..end]` as literal text, merging with a preceding
/// literal.
fn push_text(segments: &mut Vec<Segment>, value: &str, start: usize, end: usize) {
    if start >= end {
        return;
    }
    let text = &value[start..end];
    if let Some(Segment::Literal(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::literal(text));
    }
}
