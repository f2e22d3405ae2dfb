//! Property resolution and environments
//!
//! A [`PropertyResolver`] looks properties up in an ordered list of property
//! sources and expands placeholders against them. An [`Environment`] adds
//! active and default profiles on top.

mod env;
mod property_resolver;

pub use env::{ACTIVE_PROFILES_PROPERTY_NAME, DEFAULT_PROFILE, Environment};
pub use property_resolver::PropertyResolver;
