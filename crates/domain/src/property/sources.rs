//! Ordered, shareable list of property sources.

use std::sync::Arc;

use parking_lot::RwLock;

use super::source::PropertySource;
use crate::error::{DomainError, DomainResult};

/// An ordered list of property sources, highest precedence first.
///
/// Sources are identified by name: adding a source whose name is already
/// present replaces the old one at the new position. All operations take
/// `&self` so the list can be shared behind an [`Arc`].
#[derive(Debug, Default)]
pub struct MutablePropertySources {
    sources: RwLock<Vec<Arc<dyn PropertySource>>>,
}

impl MutablePropertySources {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list from sources in precedence order.
    #[must_use]
    pub fn from_sources(sources: impl IntoIterator<Item = Arc<dyn PropertySource>>) -> Self {
        let list = Self::new();
        for source in sources {
            list.add_last(source);
        }
        list
    }

    /// Returns the source with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn PropertySource>> {
        self.sources
            .read()
            .iter()
            .find(|source| source.name() == name)
            .cloned()
    }

    /// Returns true if a source with the given name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sources.read().iter().any(|source| source.name() == name)
    }

    /// Adds a source with the highest precedence.
    pub fn add_first(&self, source: Arc<dyn PropertySource>) {
        let mut sources = self.sources.write();
        remove_named(&mut sources, source.name());
        sources.insert(0, source);
    }

    /// Adds a source with the lowest precedence.
    pub fn add_last(&self, source: Arc<dyn PropertySource>) {
        let mut sources = self.sources.write();
        remove_named(&mut sources, source.name());
        sources.push(source);
    }

    /// Adds a source immediately before the source named `relative`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::SourceNotFound`] if `relative` is not present.
    pub fn add_before(&self, relative: &str, source: Arc<dyn PropertySource>) -> DomainResult<()> {
        let mut sources = self.sources.write();
        let index = position(&sources, relative)?;
        if source.name() == relative {
            sources[index] = source;
            return Ok(());
        }
        remove_named(&mut sources, source.name());
        let index = position(&sources, relative)?;
        sources.insert(index, source);
        Ok(())
    }

    /// Replaces the source named `name`, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::SourceNotFound`] if `name` is not present.
    pub fn replace(&self, name: &str, source: Arc<dyn PropertySource>) -> DomainResult<()> {
        let mut sources = self.sources.write();
        let index = position(&sources, name)?;
        sources[index] = source;
        Ok(())
    }

    /// Removes and returns the source with the given name.
    pub fn remove(&self, name: &str) -> Option<Arc<dyn PropertySource>> {
        let mut sources = self.sources.write();
        let index = sources.iter().position(|source| source.name() == name)?;
        Some(sources.remove(index))
    }

    /// Removes every source.
    pub fn clear(&self) {
        self.sources.write().clear();
    }

    /// Returns the number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.read().len()
    }

    /// Returns true if there are no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.read().is_empty()
    }

    /// Returns the sources in precedence order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<dyn PropertySource>> {
        self.sources.read().clone()
    }

    /// Returns the source names in precedence order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.sources
            .read()
            .iter()
            .map(|source| source.name().to_string())
            .collect()
    }

    /// Looks a property up in every source; the first value found wins.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<String> {
        self.sources
            .read()
            .iter()
            .find_map(|source| source.get_property(name))
    }
}

fn remove_named(sources: &mut Vec<Arc<dyn PropertySource>>, name: &str) {
    sources.retain(|existing| existing.name() != name);
}

fn position(sources: &[Arc<dyn PropertySource>], name: &str) -> DomainResult<usize> {
    sources
        .iter()
        .position(|source| source.name() == name)
        .ok_or_else(|| DomainError::SourceNotFound(name.to_string()))
}
