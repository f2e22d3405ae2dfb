//! Property sources loaded from JSON, YAML and `.properties` files.
//!
//! Structured documents are flattened into dotted keys: nested mappings join
//! their keys with `.`, sequence items are addressed as `key[index]`.
//!
//! ```yaml
//! server:
//!   port: 8080
//!   hosts: [a, b]
//! ```
//!
//! becomes `server.port = 8080`, `server.hosts[0] = a`, `server.hosts[1] = b`.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use stencil_domain::property::{MapPropertySource, PropertySource};

use crate::error::{SourceError, SourceResult};

/// Supported property file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
    /// Java `.properties`
    Properties,
}

impl FileFormat {
    /// Picks the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> SourceResult<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("properties") => Ok(Self::Properties),
            _ => Err(SourceError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// An enumerable property source read from a file.
#[derive(Debug, Clone)]
pub struct FilePropertySource {
    path: PathBuf,
    inner: MapPropertySource,
}

impl FilePropertySource {
    /// Reads and flattens the file at `path`, choosing the format from its
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unsupported, the file cannot be
    /// read, or its content does not parse.
    pub fn load(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let content = fs::read(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(path, format, &content)
    }

    /// Parses `content` in the given format. `path` is only used for the
    /// source name and error messages.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Parse`] if the content does not parse.
    pub fn from_slice(
        path: impl Into<PathBuf>,
        format: FileFormat,
        content: &[u8],
    ) -> SourceResult<Self> {
        let path = path.into();
        let properties = match format {
            FileFormat::Json => parse_json(&path, content)?,
            FileFormat::Yaml => parse_yaml(&path, content)?,
            FileFormat::Properties => parse_properties(&path, content)?,
        };

        let name = format!("file [{}]", path.display());
        tracing::debug!(source = %name, count = properties.len(), "loaded property file");
        Ok(Self {
            inner: MapPropertySource::new(name, properties),
            path,
        })
    }

    /// Returns the file this source was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the flattened properties in document order.
    #[must_use]
    pub const fn properties(&self) -> &IndexMap<String, String> {
        self.inner.properties()
    }
}

impl PropertySource for FilePropertySource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get_property(&self, name: &str) -> Option<String> {
        self.inner.get_property(name)
    }

    fn property_names(&self) -> Option<Vec<String>> {
        self.inner.property_names()
    }
}

fn parse_json(path: &Path, content: &[u8]) -> SourceResult<IndexMap<String, String>> {
    let document: serde_json::Value =
        serde_json::from_slice(content).map_err(|e| SourceError::parse(path, e))?;

    let mut properties = IndexMap::new();
    match &document {
        serde_json::Value::Object(members) => flatten_json_object(&mut properties, "", members),
        serde_json::Value::Null => {}
        _ => return Err(SourceError::parse(path, "top-level value must be an object")),
    }
    Ok(properties)
}

fn flatten_json_object(
    properties: &mut IndexMap<String, String>,
    parent: &str,
    members: &serde_json::Map<String, serde_json::Value>,
) {
    for (name, member) in members {
        flatten_json(properties, child_key(parent, name), member);
    }
}

fn flatten_json(properties: &mut IndexMap<String, String>, key: String, value: &serde_json::Value) {
    use serde_json::Value;

    match value {
        Value::Object(members) if !members.is_empty() => {
            flatten_json_object(properties, &key, members);
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, item) in items.iter().enumerate() {
                flatten_json(properties, format!("{key}[{index}]"), item);
            }
        }
        Value::Object(_) | Value::Array(_) | Value::Null => {
            properties.insert(key, String::new());
        }
        Value::String(text) => {
            properties.insert(key, text.clone());
        }
        Value::Bool(_) | Value::Number(_) => {
            properties.insert(key, value.to_string());
        }
    }
}

fn parse_yaml(path: &Path, content: &[u8]) -> SourceResult<IndexMap<String, String>> {
    let mut properties = IndexMap::new();
    if content.trim_ascii().is_empty() {
        return Ok(properties);
    }

    let document: serde_yaml::Value =
        serde_yaml::from_slice(content).map_err(|e| SourceError::parse(path, e))?;
    match untagged(&document) {
        serde_yaml::Value::Mapping(entries) => flatten_yaml_mapping(&mut properties, "", entries),
        serde_yaml::Value::Null => {}
        _ => return Err(SourceError::parse(path, "top-level value must be a mapping")),
    }
    Ok(properties)
}

fn flatten_yaml_mapping(
    properties: &mut IndexMap<String, String>,
    parent: &str,
    entries: &serde_yaml::Mapping,
) {
    for (name, entry) in entries {
        let Some(name) = yaml_scalar(name) else {
            tracing::warn!(parent, "skipping non-scalar mapping key");
            continue;
        };
        flatten_yaml(properties, child_key(parent, &name), entry);
    }
}

fn flatten_yaml(properties: &mut IndexMap<String, String>, key: String, value: &serde_yaml::Value) {
    use serde_yaml::Value;

    match untagged(value) {
        Value::Mapping(entries) if !entries.is_empty() => {
            flatten_yaml_mapping(properties, &key, entries);
        }
        Value::Sequence(items) if !items.is_empty() => {
            for (index, item) in items.iter().enumerate() {
                flatten_yaml(properties, format!("{key}[{index}]"), item);
            }
        }
        Value::Mapping(_) | Value::Sequence(_) => {
            properties.insert(key, String::new());
        }
        scalar => {
            properties.insert(key, yaml_scalar(scalar).unwrap_or_default());
        }
    }
}

fn untagged(value: &serde_yaml::Value) -> &serde_yaml::Value {
    match value {
        serde_yaml::Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match untagged(value) {
        Value::Null => Some(String::new()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

fn child_key(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn parse_properties(path: &Path, content: &[u8]) -> SourceResult<IndexMap<String, String>> {
    let mut properties = IndexMap::new();
    java_properties::PropertiesIter::new(content)
        .read_into(|key, value| {
            properties.insert(key, value);
        })
        .map_err(|e| SourceError::parse(path, e))?;
    Ok(properties)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flattened(format: FileFormat, content: &str) -> Vec<(String, String)> {
        FilePropertySource::from_slice("test", format, content.as_bytes())
            .unwrap()
            .properties()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a.json")).unwrap(), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("a.YML")).unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(Path::new("a.yaml")).unwrap(), FileFormat::Yaml);
        assert_eq!(
            FileFormat::from_path(Path::new("dir/app.properties")).unwrap(),
            FileFormat::Properties
        );
        assert!(matches!(
            FileFormat::from_path(Path::new("a.toml")),
            Err(SourceError::UnsupportedFormat(_))
        ));
        assert!(FileFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_flatten_json() {
        let content = r#"{
            "server": {"port": 8080, "ssl": false, "hosts": ["a", "b"]},
            "name": "stencil",
            "empty": {},
            "nothing": null,
            "ratio": 0.5
        }"#;

        let mut properties = flattened(FileFormat::Json, content);
        properties.sort();
        assert_eq!(
            properties,
            pairs(&[
                ("empty", ""),
                ("name", "stencil"),
                ("nothing", ""),
                ("ratio", "0.5"),
                ("server.hosts[0]", "a"),
                ("server.hosts[1]", "b"),
                ("server.port", "8080"),
                ("server.ssl", "false"),
            ])
        );
    }

    #[test]
    fn test_flatten_yaml() {
        let content = "\
server:
  port: 8080
  hosts:
    - a
    - name: b
      weight: 2
spring.profiles.active: dev
nothing:
1: numeric key
";

        assert_eq!(
            flattened(FileFormat::Yaml, content),
            pairs(&[
                ("server.port", "8080"),
                ("server.hosts[0]", "a"),
                ("server.hosts[1].name", "b"),
                ("server.hosts[1].weight", "2"),
                ("spring.profiles.active", "dev"),
                ("nothing", ""),
                ("1", "numeric key"),
            ])
        );
    }

    #[test]
    fn test_parse_properties() {
        let content = "\
# comment
db.url=jdbc:h2:mem
db.user = admin
greeting: hello ${name}
";

        assert_eq!(
            flattened(FileFormat::Properties, content),
            pairs(&[
                ("db.url", "jdbc:h2:mem"),
                ("db.user", "admin"),
                ("greeting", "hello ${name}"),
            ])
        );
    }

    #[test]
    fn test_empty_documents() {
        assert!(flattened(FileFormat::Yaml, "").is_empty());
        assert!(flattened(FileFormat::Yaml, "{}").is_empty());
        assert!(flattened(FileFormat::Json, "null").is_empty());
        assert!(flattened(FileFormat::Json, "{}").is_empty());
        assert!(flattened(FileFormat::Properties, "").is_empty());
    }

    #[test]
    fn test_invalid_documents() {
        let error = FilePropertySource::from_slice("bad.json", FileFormat::Json, b"{").unwrap_err();
        assert!(matches!(error, SourceError::Parse { .. }));
        assert!(error.to_string().starts_with("failed to parse 'bad.json'"));

        let error = FilePropertySource::from_slice("list.yaml", FileFormat::Yaml, b"- a\n- b\n")
            .unwrap_err();
        assert!(error.to_string().contains("top-level value must be a mapping"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("application.yml");
        fs::write(&path, "app:\n  name: demo\n").unwrap();

        let source = FilePropertySource::load(&path).unwrap();
        assert_eq!(source.name(), format!("file [{}]", path.display()));
        assert_eq!(source.path(), path.as_path());
        assert_eq!(source.get_property("app.name").as_deref(), Some("demo"));
        assert_eq!(source.property_names().unwrap(), vec!["app.name"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = FilePropertySource::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(error, SourceError::Io { .. }));
    }
}
