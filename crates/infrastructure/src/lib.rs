//! Stencil Infrastructure - Property sources and environments
//!
//! This crate provides the property sources that read from outside the
//! process model: the process environment and JSON, YAML and
//! `.properties` files.

pub mod error;
pub mod sources;
pub mod standard;

pub use error::{SourceError, SourceResult};
pub use sources::{
    FileFormat, FilePropertySource, SYSTEM_ENVIRONMENT_PROPERTY_SOURCE_NAME,
    SystemEnvironmentPropertySource,
};
pub use standard::{add_file_sources, standard_environment, standard_environment_with_syntax};
