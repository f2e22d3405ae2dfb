//! Integration tests for placeholder resolution through environments.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use stencil_application::{ApplicationError, Environment, PlaceholderHelper, PlaceholderResolver};
use stencil_domain::{
    CompositePropertySource, MapPropertySource, PlaceholderSyntax, PropertySource,
    ResolutionErrorKind,
};

fn layered_environment() -> Environment {
    let environment = Environment::new();
    let sources = environment.property_sources();
    sources.add_last(Arc::new(MapPropertySource::from_pairs(
        "defaults",
        [
            ("app.name", "stencil"),
            ("app.url", "http://${app.host}:${app.port:8080}/${app.name}"),
            ("app.host", "localhost"),
        ],
    )));
    sources.add_first(Arc::new(MapPropertySource::from_pairs(
        "overrides",
        [("app.host", "example.org")],
    )));
    environment
}

#[test]
fn test_layered_resolution() {
    let environment = layered_environment();

    assert_eq!(
        environment.resolve_required_placeholders("${app.url}").unwrap(),
        "http://example.org:8080/stencil"
    );

    environment.property_sources().remove("overrides");
    assert_eq!(
        environment.resolve_required_placeholders("${app.url}").unwrap(),
        "http://localhost:8080/stencil"
    );
}

#[test]
fn test_error_chain_through_sources() {
    let environment = Environment::new();
    environment
        .property_sources()
        .add_last(Arc::new(MapPropertySource::from_pairs(
            "app",
            [("outer", "[${inner}]"), ("inner", "<${missing}>")],
        )));

    let ApplicationError::Resolution(error) = environment
        .resolve_required_placeholders("x=${outer}")
        .unwrap_err()
    else {
        panic!("expected a resolution error");
    };

    assert_eq!(error.kind(), ResolutionErrorKind::Unresolvable);
    assert_eq!(error.values(), ["<${missing}>", "[${inner}]", "x=${outer}"]);
    assert_eq!(
        error.to_string(),
        r#"Could not resolve placeholder 'missing' in value "<${missing}>" <-- "[${inner}]" <-- "x=${outer}""#
    );
}

#[test]
fn test_composite_source_in_environment() {
    let mut composite = CompositePropertySource::new("bundle");
    composite.add_property_source(Arc::new(MapPropertySource::from_pairs("a", [("k", "a")])));
    composite.add_first_property_source(Arc::new(MapPropertySource::from_pairs(
        "b",
        [("k", "b"), ("only_b", "yes")],
    )));

    let environment = Environment::new();
    environment.property_sources().add_last(Arc::new(composite));

    assert_eq!(environment.resolve_placeholders("${k}/${only_b}").unwrap(), "b/yes");
}

#[test]
fn test_resolvers_are_interchangeable() {
    let helper = PlaceholderHelper::new(PlaceholderSyntax::standard());
    let map = HashMap::from([("who".to_string(), "map".to_string())]);
    let json = serde_json::json!({"who": "json"});
    let source: Arc<dyn PropertySource> =
        Arc::new(MapPropertySource::from_pairs("src", [("who", "source")]));
    let function = |name: &str| (name == "who").then(|| "function".to_string());

    let resolvers: [(&dyn PlaceholderResolver, &str); 3] =
        [(&map, "map"), (&json, "json"), (&function, "function")];
    for (resolver, expected) in resolvers {
        assert_eq!(
            helper.replace_placeholders("${who}", resolver).unwrap(),
            expected
        );
    }

    // Unsized sources are passed directly.
    assert_eq!(
        helper.replace_placeholders("${who}", source.as_ref()).unwrap(),
        "source"
    );
}

#[test]
fn test_environment_shared_across_threads() {
    let environment = Arc::new(layered_environment());

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let environment = Arc::clone(&environment);
            thread::spawn(move || {
                let text = format!("{index}:${{app.name}}");
                environment.resolve_placeholders(&text).unwrap()
            })
        })
        .collect();

    for (index, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("{index}:stencil"));
    }
}
