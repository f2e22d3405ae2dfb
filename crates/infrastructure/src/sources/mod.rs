//! Property source implementations backed by the outside world.

mod file;
mod system_env;

pub use file::{FileFormat, FilePropertySource};
pub use system_env::{SYSTEM_ENVIRONMENT_PROPERTY_SOURCE_NAME, SystemEnvironmentPropertySource};
