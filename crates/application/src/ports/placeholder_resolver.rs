//! Placeholder resolver port
//!
//! The single capability the resolution engine needs: map a placeholder key
//! to a value. Functions, maps, JSON objects and property sources all
//! implement it, so callers can pass whichever they have.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;
use serde_json::Value;
use stencil_domain::property::{MutablePropertySources, PropertySource};

/// Looks up the value of a placeholder key.
pub trait PlaceholderResolver {
    /// Returns the value for `name`, or `None` when it is unknown.
    fn resolve_placeholder(&self, name: &str) -> Option<String>;
}

impl<F> PlaceholderResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self(name)
    }
}

impl<S: BuildHasher> PlaceholderResolver for HashMap<String, String, S> {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl PlaceholderResolver for BTreeMap<String, String> {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<S: BuildHasher> PlaceholderResolver for IndexMap<String, String, S> {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Looks keys up as members of a JSON object. Strings are returned as-is,
/// numbers and booleans in their JSON form; anything else is unknown.
impl PlaceholderResolver for Value {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.as_object()?.resolve_placeholder(name)
    }
}

impl PlaceholderResolver for serde_json::Map<String, Value> {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl PlaceholderResolver for MutablePropertySources {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.get_property(name)
    }
}

impl PlaceholderResolver for dyn PropertySource {
    fn resolve_placeholder(&self, name: &str) -> Option<String> {
        self.get_property(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use stencil_domain::property::MapPropertySource;

    #[test]
    fn test_function_resolver() {
        let resolver = |name: &str| (name == "foo").then(|| "bar".to_string());
        assert_eq!(resolver.resolve_placeholder("foo"), Some("bar".to_string()));
        assert_eq!(resolver.resolve_placeholder("baz"), None);
    }

    #[test]
    fn test_map_resolvers() {
        let hash: HashMap<String, String> = HashMap::from([("k".into(), "v".into())]);
        let btree: BTreeMap<String, String> = BTreeMap::from([("k".into(), "v".into())]);
        let index: IndexMap<String, String> = IndexMap::from([("k".into(), "v".into())]);

        for resolver in [
            &hash as &dyn PlaceholderResolver,
            &btree as &dyn PlaceholderResolver,
            &index as &dyn PlaceholderResolver,
        ] {
            assert_eq!(resolver.resolve_placeholder("k"), Some("v".to_string()));
            assert_eq!(resolver.resolve_placeholder("missing"), None);
        }
    }

    #[test]
    fn test_json_object_resolver() {
        let value = json!({
            "name": "stencil",
            "port": 8080,
            "debug": true,
            "nothing": null,
            "nested": {"a": 1},
        });

        assert_eq!(value.resolve_placeholder("name"), Some("stencil".to_string()));
        assert_eq!(value.resolve_placeholder("port"), Some("8080".to_string()));
        assert_eq!(value.resolve_placeholder("debug"), Some("true".to_string()));
        assert_eq!(value.resolve_placeholder("nothing"), None);
        assert_eq!(value.resolve_placeholder("nested"), None);
        assert_eq!(value.resolve_placeholder("missing"), None);
        assert_eq!(json!([1, 2]).resolve_placeholder("0"), None);
    }

    #[test]
    fn test_property_source_resolvers() {
        let sources = MutablePropertySources::new();
        sources.add_last(Arc::new(MapPropertySource::from_pairs("a", [("k", "from-a")])));
        sources.add_last(Arc::new(MapPropertySource::from_pairs("b", [("k", "from-b")])));
        assert_eq!(sources.resolve_placeholder("k"), Some("from-a".to_string()));

        let source: Arc<dyn PropertySource> =
            Arc::new(MapPropertySource::from_pairs("single", [("x", "y")]));
        assert_eq!(source.as_ref().resolve_placeholder("x"), Some("y".to_string()));
    }
}
