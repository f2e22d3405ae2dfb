//! Ready-made environments.

use std::path::Path;
use std::sync::Arc;

use stencil_application::{Environment, PropertyResolver};
use stencil_domain::placeholder::PlaceholderSyntax;
use stencil_domain::property::MutablePropertySources;

use crate::error::SourceResult;
use crate::sources::{FilePropertySource, SystemEnvironmentPropertySource};

/// Creates an environment whose only source is the process environment.
#[must_use]
pub fn standard_environment() -> Environment {
    standard_environment_with_syntax(PlaceholderSyntax::standard())
}

/// Like [`standard_environment`], resolving placeholders with `syntax`.
#[must_use]
pub fn standard_environment_with_syntax(syntax: PlaceholderSyntax) -> Environment {
    let sources = MutablePropertySources::new();
    sources.add_last(Arc::new(SystemEnvironmentPropertySource::new()));
    Environment::with_resolver(PropertyResolver::with_syntax(Arc::new(sources), syntax))
}

/// Loads each file as a property source and adds it ahead of the existing
/// sources. Earlier files take precedence over later ones.
///
/// # Errors
///
/// Returns the first error raised while loading a file; no source is added
/// in that case.
pub fn add_file_sources<P: AsRef<Path>>(
    environment: &Environment,
    paths: impl IntoIterator<Item = P>,
) -> SourceResult<()> {
    let loaded = paths
        .into_iter()
        .map(FilePropertySource::load)
        .collect::<SourceResult<Vec<_>>>()?;

    for source in loaded.into_iter().rev() {
        environment.property_sources().add_first(Arc::new(source));
    }
    Ok(())
}
