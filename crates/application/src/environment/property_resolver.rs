//! Property lookup and placeholder resolution over layered sources.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;
use stencil_domain::placeholder::PlaceholderSyntax;
use stencil_domain::property::MutablePropertySources;

use crate::error::{ApplicationError, ApplicationResult};
use crate::placeholder::PlaceholderHelper;
use crate::ports::PlaceholderResolver;

/// Resolves properties and placeholders against a shared list of property
/// sources.
///
/// Two placeholder helpers are kept: a lenient one that leaves unknown
/// placeholders in place and a strict one that fails on them.
#[derive(Debug)]
pub struct PropertyResolver {
    sources: Arc<MutablePropertySources>,
    non_strict: PlaceholderHelper,
    strict: PlaceholderHelper,
    required: RwLock<IndexSet<String>>,
}

impl PropertyResolver {
    /// Creates a resolver using the standard `${key:default}` syntax with
    /// `\` as escape character.
    #[must_use]
    pub fn new(sources: Arc<MutablePropertySources>) -> Self {
        Self::with_syntax(sources, PlaceholderSyntax::standard())
    }

    /// Creates a resolver with a custom placeholder syntax. The syntax's own
    /// unresolvable policy is ignored; each helper sets its own.
    #[must_use]
    pub fn with_syntax(sources: Arc<MutablePropertySources>, syntax: PlaceholderSyntax) -> Self {
        Self {
            sources,
            non_strict: PlaceholderHelper::new(syntax.clone().with_ignore_unresolvable(true)),
            strict: PlaceholderHelper::new(syntax.with_ignore_unresolvable(false)),
            required: RwLock::new(IndexSet::new()),
        }
    }

    /// Returns the sources this resolver reads from.
    #[must_use]
    pub const fn property_sources(&self) -> &Arc<MutablePropertySources> {
        &self.sources
    }

    /// Returns the placeholder syntax in use.
    #[must_use]
    pub const fn syntax(&self) -> &PlaceholderSyntax {
        self.non_strict.syntax()
    }

    /// Returns the raw value of `key` from the first source that has it.
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<String> {
        let value = self.sources.get_property(key);
        tracing::trace!(key, found = value.is_some(), "property lookup");
        value
    }

    /// Returns the value of `key`, or `default` when no source has it.
    #[must_use]
    pub fn get_property_or(&self, key: &str, default: impl Into<String>) -> String {
        self.get_property(key).unwrap_or_else(|| default.into())
    }

    /// Returns the value of `key` parsed as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Conversion`] if the value does not parse.
    pub fn get_property_as<T>(&self, key: &str) -> ApplicationResult<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get_property(key)
            .map(|value| convert(key, value))
            .transpose()
    }

    /// Returns the value of `key`, failing when no source has it.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::PropertyNotFound`] if `key` is unknown.
    pub fn get_required_property(&self, key: &str) -> ApplicationResult<String> {
        self.get_property(key)
            .ok_or_else(|| ApplicationError::PropertyNotFound(key.to_string()))
    }

    /// Returns the value of `key` parsed as `T`, failing when no source has
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::PropertyNotFound`] if `key` is unknown and
    /// [`ApplicationError::Conversion`] if the value does not parse.
    pub fn get_required_property_as<T>(&self, key: &str) -> ApplicationResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        convert(key, self.get_required_property(key)?)
    }

    /// Returns true if any source has a value for `key`.
    #[must_use]
    pub fn contains_property(&self, key: &str) -> bool {
        self.get_property(key).is_some()
    }

    /// Replaces the set of required property names.
    pub fn set_required_properties<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut required = self.required.write();
        required.clear();
        required.extend(names.into_iter().map(Into::into));
    }

    /// Adds names to the set of required properties.
    pub fn add_required_properties<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.write().extend(names.into_iter().map(Into::into));
    }

    /// Returns the required property names in declaration order.
    #[must_use]
    pub fn required_properties(&self) -> Vec<String> {
        self.required.read().iter().cloned().collect()
    }

    /// Checks that every required property has a value.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::MissingRequiredProperties`] listing every
    /// required property without a value.
    pub fn validate_required_properties(&self) -> ApplicationResult<()> {
        let missing: Vec<String> = self
            .required
            .read()
            .iter()
            .filter(|key| !self.contains_property(key))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            tracing::debug!(?missing, "required properties missing");
            Err(ApplicationError::MissingRequiredProperties(missing))
        }
    }

    /// Replaces placeholders in `text`, leaving unknown ones untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Resolution`] on a circular reference.
    pub fn resolve_placeholders(&self, text: &str) -> ApplicationResult<String> {
        Ok(self
            .non_strict
            .replace_placeholders(text, self.sources.as_ref())?)
    }

    /// Replaces placeholders in `text`, failing on unknown ones.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Resolution`] on an unresolvable
    /// placeholder or a circular reference.
    pub fn resolve_required_placeholders(&self, text: &str) -> ApplicationResult<String> {
        Ok(self.strict.replace_placeholders(text, self.sources.as_ref())?)
    }
}

impl PlaceholderResolver for PropertyResolver {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.get_property(name)
    }
}

fn convert<T>(key: &str, value: String) -> ApplicationResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse::<T>()
        .map_err(|error: T::Err| ApplicationError::Conversion {
            key: key.to_string(),
            reason: error.to_string(),
            value,
        })
}
