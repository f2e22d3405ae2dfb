//! Environment with profiles over layered property sources.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;
use stencil_domain::property::MutablePropertySources;
use stencil_domain::{DomainError, DomainResult};

use super::property_resolver::PropertyResolver;
use crate::error::ApplicationResult;
use crate::ports::PlaceholderResolver;

/// Property holding a comma-separated list of active profiles.
pub const ACTIVE_PROFILES_PROPERTY_NAME: &str = "spring.profiles.active";

/// Profile that is active when no other profile is.
pub const DEFAULT_PROFILE: &str = "default";

/// Property sources plus a resolver and a set of active profiles.
///
/// When no profiles have been set explicitly, the active profiles are read
/// from the active-profiles property on first use.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use stencil_application::Environment;
/// use stencil_domain::MapPropertySource;
///
/// let env = Environment::new();
/// env.property_sources().add_last(Arc::new(MapPropertySource::from_pairs(
///     "app",
///     [("spring.profiles.active", "dev, local"), ("db.host", "localhost")],
/// )));
///
/// assert_eq!(env.active_profiles(), vec!["dev", "local"]);
/// assert_eq!(env.resolve_placeholders("db=${db.host}").unwrap(), "db=localhost");
/// ```
#[derive(Debug)]
pub struct Environment {
    resolver: PropertyResolver,
    active_profiles_property: String,
    active_profiles: RwLock<IndexSet<String>>,
    default_profiles: RwLock<IndexSet<String>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates an environment with no property sources.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sources(Arc::new(MutablePropertySources::new()))
    }

    /// Creates an environment over existing sources.
    #[must_use]
    pub fn with_sources(sources: Arc<MutablePropertySources>) -> Self {
        Self::with_resolver(PropertyResolver::new(sources))
    }

    /// Creates an environment around a configured resolver, sharing its
    /// sources.
    #[must_use]
    pub fn with_resolver(resolver: PropertyResolver) -> Self {
        Self {
            resolver,
            active_profiles_property: ACTIVE_PROFILES_PROPERTY_NAME.to_string(),
            active_profiles: RwLock::new(IndexSet::new()),
            default_profiles: RwLock::new(IndexSet::from([DEFAULT_PROFILE.to_string()])),
        }
    }

    /// Reads active profiles from `name` instead of
    /// [`ACTIVE_PROFILES_PROPERTY_NAME`].
    #[must_use]
    pub fn with_active_profiles_property(mut self, name: impl Into<String>) -> Self {
        self.active_profiles_property = name.into();
        self
    }

    /// Returns the property sources, highest precedence first.
    #[must_use]
    pub const fn property_sources(&self) -> &Arc<MutablePropertySources> {
        self.resolver.property_sources()
    }

    /// Returns the underlying property resolver.
    #[must_use]
    pub const fn property_resolver(&self) -> &PropertyResolver {
        &self.resolver
    }

    /// Returns the active profiles in activation order.
    ///
    /// If none were set, they are loaded from the active-profiles property.
    /// Invalid entries in that property are skipped.
    pub fn active_profiles(&self) -> Vec<String> {
        {
            let active = self.active_profiles.read();
            if !active.is_empty() {
                return active.iter().cloned().collect();
            }
        }

        let Some(value) = self.resolver.get_property(&self.active_profiles_property) else {
            return Vec::new();
        };

        let mut active = self.active_profiles.write();
        if active.is_empty() {
            for profile in value.split(',').map(str::trim) {
                match validate_profile(profile) {
                    Ok(()) => {
                        active.insert(profile.to_string());
                    }
                    Err(error) => tracing::warn!(%error, "skipping profile from property"),
                }
            }
            tracing::debug!(profiles = ?*active, "activated profiles from property");
        }
        active.iter().cloned().collect()
    }

    /// Replaces the active profiles.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProfile`] if any profile is invalid; the
    /// active profiles are left unchanged in that case.
    pub fn set_active_profiles<I, S>(&self, profiles: I) -> DomainResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let profiles = validated(profiles)?;
        tracing::debug!(?profiles, "setting active profiles");
        *self.active_profiles.write() = profiles;
        Ok(())
    }

    /// Adds a profile to the active profiles.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProfile`] if the profile is invalid.
    pub fn add_active_profile(&self, profile: impl Into<String>) -> DomainResult<()> {
        let profile = profile.into();
        validate_profile(&profile)?;
        self.active_profiles();
        tracing::debug!(%profile, "activating profile");
        self.active_profiles.write().insert(profile);
        Ok(())
    }

    /// Returns the profiles that apply when no profile is active.
    #[must_use]
    pub fn default_profiles(&self) -> Vec<String> {
        self.default_profiles.read().iter().cloned().collect()
    }

    /// Replaces the default profiles.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProfile`] if any profile is invalid.
    pub fn set_default_profiles<I, S>(&self, profiles: I) -> DomainResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.default_profiles.write() = validated(profiles)?;
        Ok(())
    }

    /// Returns true if `profile` is active, or, when nothing is active, is
    /// a default profile. A leading `!` negates the check.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProfile`] if the profile name is empty.
    pub fn accepts_profile(&self, profile: &str) -> DomainResult<bool> {
        match profile.strip_prefix('!') {
            Some(negated) => Ok(!self.is_profile_active(negated)?),
            None => self.is_profile_active(profile),
        }
    }

    fn is_profile_active(&self, profile: &str) -> DomainResult<bool> {
        validate_profile(profile)?;
        let active = self.active_profiles();
        if active.is_empty() {
            return Ok(self.default_profiles.read().contains(profile));
        }
        Ok(active.iter().any(|name| name == profile))
    }

    /// Merges a parent environment into this one.
    ///
    /// Parent sources whose names are not present here are appended with
    /// the lowest precedence, and the parent's active profiles are added.
    pub fn merge(&self, parent: &Self) {
        for source in parent.property_sources().snapshot() {
            if !self.property_sources().contains(source.name()) {
                tracing::debug!(source = source.name(), "merging parent property source");
                self.property_sources().add_last(source);
            }
        }

        let parent_profiles = parent.active_profiles();
        if !parent_profiles.is_empty() {
            self.active_profiles.write().extend(parent_profiles);
        }
    }

    /// See [`PropertyResolver::get_property`].
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<String> {
        self.resolver.get_property(key)
    }

    /// See [`PropertyResolver::get_property_or`].
    #[must_use]
    pub fn get_property_or(&self, key: &str, default: impl Into<String>) -> String {
        self.resolver.get_property_or(key, default)
    }

    /// See [`PropertyResolver::get_property_as`].
    ///
    /// # Errors
    ///
    /// Fails if the value does not parse as `T`.
    pub fn get_property_as<T>(&self, key: &str) -> ApplicationResult<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.resolver.get_property_as(key)
    }

    /// See [`PropertyResolver::get_required_property`].
    ///
    /// # Errors
    ///
    /// Fails if no source has `key`.
    pub fn get_required_property(&self, key: &str) -> ApplicationResult<String> {
        self.resolver.get_required_property(key)
    }

    /// See [`PropertyResolver::get_required_property_as`].
    ///
    /// # Errors
    ///
    /// Fails if no source has `key` or the value does not parse as `T`.
    pub fn get_required_property_as<T>(&self, key: &str) -> ApplicationResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.resolver.get_required_property_as(key)
    }

    /// See [`PropertyResolver::contains_property`].
    #[must_use]
    pub fn contains_property(&self, key: &str) -> bool {
        self.resolver.contains_property(key)
    }

    /// See [`PropertyResolver::set_required_properties`].
    pub fn set_required_properties<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolver.set_required_properties(names);
    }

    /// See [`PropertyResolver::add_required_properties`].
    pub fn add_required_properties<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolver.add_required_properties(names);
    }

    /// See [`PropertyResolver::validate_required_properties`].
    ///
    /// # Errors
    ///
    /// Fails listing every required property without a value.
    pub fn validate_required_properties(&self) -> ApplicationResult<()> {
        self.resolver.validate_required_properties()
    }

    /// See [`PropertyResolver::resolve_placeholders`].
    ///
    /// # Errors
    ///
    /// Fails on a circular reference.
    pub fn resolve_placeholders(&self, text: &str) -> ApplicationResult<String> {
        self.resolver.resolve_placeholders(text)
    }

    /// See [`PropertyResolver::resolve_required_placeholders`].
    ///
    /// # Errors
    ///
    /// Fails on an unresolvable placeholder or a circular reference.
    pub fn resolve_required_placeholders(&self, text: &str) -> ApplicationResult<String> {
        self.resolver.resolve_required_placeholders(text)
    }
}

impl PlaceholderResolver for Environment {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.get_property(name)
    }
}

fn validate_profile(profile: &str) -> DomainResult<()> {
    if profile.is_empty() {
        return Err(DomainError::InvalidProfile(
            "Invalid profile []: must contain text".to_string(),
        ));
    }
    if profile.starts_with('!') {
        return Err(DomainError::InvalidProfile(format!(
            "Invalid profile [{profile}]: must not begin with ! operator"
        )));
    }
    Ok(())
}

fn validated<I, S>(profiles: I) -> DomainResult<IndexSet<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    profiles
        .into_iter()
        .map(|profile| {
            let profile = profile.into();
            validate_profile(&profile).map(|()| profile)
        })
        .collect()
}
