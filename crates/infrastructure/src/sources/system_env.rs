//! Property source over the process environment.

use indexmap::IndexMap;
use stencil_domain::property::{MapPropertySource, PropertySource};

/// Name of the process environment source.
pub const SYSTEM_ENVIRONMENT_PROPERTY_SOURCE_NAME: &str = "systemEnvironment";

/// Snapshot of the process environment.
///
/// Besides exact names, a property such as `server.port` or
/// `server-port` also matches the variable `SERVER_PORT`.
#[derive(Debug, Clone)]
pub struct SystemEnvironmentPropertySource {
    inner: MapPropertySource,
}

impl SystemEnvironmentPropertySource {
    /// Captures the current process environment. Variables whose name or
    /// value is not valid Unicode are skipped.
    #[must_use]
    pub fn new() -> Self {
        Self::from_vars(std::env::vars_os().filter_map(|(name, value)| {
            Some((name.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    /// Creates the source from explicit variables.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let variables: IndexMap<String, String> = vars
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        tracing::debug!(count = variables.len(), "captured environment variables");
        Self {
            inner: MapPropertySource::new(SYSTEM_ENVIRONMENT_PROPERTY_SOURCE_NAME, variables),
        }
    }

    /// Returns the variable that `name` resolves to, if any.
    #[must_use]
    pub fn resolve_name(&self, name: &str) -> Option<String> {
        candidates(name).find(|candidate| self.inner.get(candidate).is_some())
    }
}

impl Default for SystemEnvironmentPropertySource {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertySource for SystemEnvironmentPropertySource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get_property(&self, name: &str) -> Option<String> {
        let variable = self.resolve_name(name)?;
        if variable != name {
            tracing::trace!(name, %variable, "matched relaxed environment variable");
        }
        self.inner.get_property(&variable)
    }

    fn property_names(&self) -> Option<Vec<String>> {
        self.inner.property_names()
    }
}

/// Yields `name`, then forms with `.` and `-` replaced by `_`, then the
/// upper-cased versions of all of them.
fn candidates(name: &str) -> impl Iterator<Item = String> {
    let forms = [
        name.to_string(),
        name.replace('.', "_"),
        name.replace('-', "_"),
        name.replace(['.', '-'], "_"),
    ];
    let upper = forms.clone().map(|form| form.to_uppercase());
    forms.into_iter().chain(upper)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source() -> SystemEnvironmentPropertySource {
        SystemEnvironmentPropertySource::from_vars([
            ("PATH", "/usr/bin"),
            ("SERVER_PORT", "8080"),
            ("my.exact", "exact"),
            ("db_url", "jdbc"),
        ])
    }

    #[test]
    fn test_exact_lookup() {
        let source = source();
        assert_eq!(source.name(), "systemEnvironment");
        assert_eq!(source.get_property("PATH").as_deref(), Some("/usr/bin"));
        assert_eq!(source.get_property("my.exact").as_deref(), Some("exact"));
    }

    #[test]
    fn test_relaxed_lookup() {
        let source = source();
        assert_eq!(source.get_property("server.port").as_deref(), Some("8080"));
        assert_eq!(source.get_property("server-port").as_deref(), Some("8080"));
        assert_eq!(source.get_property("db.url").as_deref(), Some("jdbc"));
        assert_eq!(source.resolve_name("server.port").as_deref(), Some("SERVER_PORT"));
        assert_eq!(source.get_property("server.host"), None);
    }

    #[test]
    fn test_is_enumerable() {
        let names = source().property_names().unwrap();
        assert_eq!(names, vec!["PATH", "SERVER_PORT", "my.exact", "db_url"]);
    }

    #[test]
    fn test_captures_process_environment() {
        let source = SystemEnvironmentPropertySource::new();
        let names = source.property_names().unwrap();
        for name in names.iter().take(5) {
            assert!(source.contains_property(name));
        }
    }
}
