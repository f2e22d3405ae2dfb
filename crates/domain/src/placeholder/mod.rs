//! Placeholder domain types
//!
//! Delimiter configuration, parsed segments and resolution errors. Parsing
//! and resolution live in the application layer.

mod error;
mod segment;
mod syntax;

pub use error::{PlaceholderResolutionError, ResolutionErrorKind};
pub use segment::{NestedPlaceholder, Segment, SimplePlaceholder, is_text_only};
pub use syntax::{
    DEFAULT_ESCAPE, DEFAULT_PREFIX, DEFAULT_SEPARATOR, DEFAULT_SUFFIX, PlaceholderSyntax,
};
