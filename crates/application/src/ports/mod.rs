//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the resolution core and the systems
//! that supply values. Adapters for common value holders live next to the
//! trait.

mod placeholder_resolver;

pub use placeholder_resolver::PlaceholderResolver;
