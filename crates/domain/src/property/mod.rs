//! Layered property sources
//!
//! Named key/value sources combined in precedence order. The first source
//! holding a value for a key wins.

mod composite;
mod source;
mod sources;

pub use composite::CompositePropertySource;
pub use source::{MapPropertySource, PropertySource};
pub use sources::MutablePropertySources;
