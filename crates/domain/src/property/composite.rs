//! A property source that iterates over a list of other sources.

use std::sync::Arc;

use super::source::PropertySource;
use crate::error::{DomainError, DomainResult};

/// Combines several sources under one name; the first child with a value
/// wins.
#[derive(Debug, Clone, Default)]
pub struct CompositePropertySource {
    name: String,
    sources: Vec<Arc<dyn PropertySource>>,
}

impl CompositePropertySource {
    /// Creates an empty composite source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
        }
    }

    /// Appends a child source with the lowest precedence.
    pub fn add_property_source(&mut self, source: Arc<dyn PropertySource>) {
        self.sources.push(source);
    }

    /// Inserts a child source with the highest precedence.
    pub fn add_first_property_source(&mut self, source: Arc<dyn PropertySource>) {
        self.sources.insert(0, source);
    }

    /// Returns the child sources in precedence order.
    #[must_use]
    pub fn property_sources(&self) -> &[Arc<dyn PropertySource>] {
        &self.sources
    }

    /// Collects the property names of every child.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonEnumerableSource`] naming the first child
    /// that cannot enumerate its names.
    pub fn try_property_names(&self) -> DomainResult<Vec<String>> {
        let mut names = Vec::new();
        for source in &self.sources {
            let child_names = source
                .property_names()
                .ok_or_else(|| DomainError::NonEnumerableSource(source.name().to_string()))?;
            for name in child_names {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }
}

impl PropertySource for CompositePropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_property(&self, name: &str) -> Option<String> {
        self.sources
            .iter()
            .find_map(|source| source.get_property(name))
    }

    fn property_names(&self) -> Option<Vec<String>> {
        self.try_property_names().ok()
    }
}
