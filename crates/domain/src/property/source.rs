//! Property source abstraction and the map-backed implementation.

use std::fmt::Debug;

use indexmap::IndexMap;

/// A named source of string properties.
///
/// Several sources are layered by [`MutablePropertySources`]; the first
/// source that has a value for a name wins.
///
/// [`MutablePropertySources`]: super::MutablePropertySources
pub trait PropertySource: Debug + Send + Sync {
    /// Returns the name of this source (typically a file name or a backend
    /// identifier).
    fn name(&self) -> &str;

    /// Returns the value of the property, if this source has one.
    fn get_property(&self, name: &str) -> Option<String>;

    /// Returns true if this source has a value for the property.
    fn contains_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }

    /// Returns every property name of this source, or `None` when the source
    /// cannot enumerate its names.
    fn property_names(&self) -> Option<Vec<String>> {
        None
    }
}

/// A collection of properties held in memory.
///
/// # Example
///
/// ```
/// use stencil_domain::property::{MapPropertySource, PropertySource};
///
/// let source = MapPropertySource::from_pairs(
///     "application.yml",
///     [("server.port", "8080")],
/// );
/// assert_eq!(source.get_property("server.port").as_deref(), Some("8080"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapPropertySource {
    name: String,
    properties: IndexMap<String, String>,
}

impl MapPropertySource {
    /// Creates a source with the given name and properties.
    pub fn new(name: impl Into<String>, properties: IndexMap<String, String>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// Creates a source from key/value pairs, keeping their order.
    pub fn from_pairs<K, V>(name: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            name,
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Returns a reference to the properties map.
    #[must_use]
    pub const fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    /// Gets a property value by key without copying it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Sets a property, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.insert(key.into(), value.into())
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if there are no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl PropertySource for MapPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }

    fn contains_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    fn property_names(&self) -> Option<Vec<String>> {
        Some(self.properties.keys().cloned().collect())
    }
}
