//! Stencil Domain - Core types
//!
//! This crate defines the domain model for placeholder resolution:
//! delimiter configuration, parsed segments, resolution errors and the
//! property sources placeholders are resolved against.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod placeholder;
pub mod property;

pub use error::{DomainError, DomainResult};
pub use placeholder::{
    NestedPlaceholder, PlaceholderResolutionError, PlaceholderSyntax, ResolutionErrorKind,
    Segment, SimplePlaceholder,
};
pub use property::{
    CompositePropertySource, MapPropertySource, MutablePropertySources, PropertySource,
};
