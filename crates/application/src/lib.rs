//! Stencil Application - Parsing, resolution and environments
//!
//! This crate turns text with placeholders into resolved text. It contains
//! the segment parser, the resolution engine, the [`ports::PlaceholderResolver`]
//! port with adapters for common value holders, and the property resolver
//! and environment built on layered property sources.

pub mod environment;
pub mod error;
pub mod placeholder;
pub mod ports;

pub use environment::{Environment, PropertyResolver};
pub use error::{ApplicationError, ApplicationResult};
pub use placeholder::PlaceholderHelper;
pub use ports::PlaceholderResolver;
