/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The merged configuration document.

use crate::header::CLOUD_CONFIG_HEADER;
use crate::merge::merge_mappings;
use crate::types::{ConfigError, Result};
use nodeconf_yaml::{Mapping, Value, mapping_to_yaml_string, to_yaml_string};
use std::fmt;

/// Reserved key pointing at another document to fetch and merge.
pub const CONFIG_URL_KEY: &str = "config_url";

/// A configuration document: a mapping at the root, plus merge, query and
/// serialization.
///
/// `Display` renders the canonical text form: the `#cloud-config` header, a
/// blank line, then the mapping with sorted keys and four-space indentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    entries: Mapping,
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mapping(entries: Mapping) -> Self {
        Self { entries }
    }

    /// Wrap a decoded value. `null` (an empty document) becomes an empty
    /// configuration; any other non-mapping value is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Mapping(entries) => Ok(Self { entries }),
            Value::Null => Ok(Self::new()),
            other => Err(ConfigError::NotAMapping { kind: other.kind() }),
        }
    }

    /// Decode a YAML or JSON document.
    pub fn parse(content: &str) -> Result<Self> {
        Self::from_value(nodeconf_yaml::parse(content)?)
    }

    /// Decode a YAML or JSON document from raw bytes.
    pub fn parse_bytes(content: &[u8]) -> Result<Self> {
        Self::from_value(nodeconf_yaml::parse_bytes(content)?)
    }

    /// Merge `other` into this configuration, `other` taking precedence.
    ///
    /// On error the configuration is left as it was.
    pub fn merge_config(&mut self, other: Config) -> Result<()> {
        self.entries = merge_mappings(self.entries.clone(), other.entries)?;
        Ok(())
    }

    /// The `config_url` value, if it is a non-empty string.
    pub fn config_url(&self) -> Option<&str> {
        self.entries
            .get(CONFIG_URL_KEY)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.entries
    }

    pub fn into_mapping(self) -> Mapping {
        self.entries
    }

    pub fn into_value(self) -> Value {
        Value::Mapping(self.entries)
    }

    /// Resolve a dotted path (`some.other.key`). Numeric segments index into
    /// sequences. An empty path, or `.`, addresses the whole document.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let path = path.strip_prefix('.').unwrap_or(path);
        let mut segments = path.split('.').filter(|s| !s.is_empty());

        let first = segments.next()?;
        let mut current = self.entries.get(first)?;
        for segment in segments {
            current = match current {
                Value::Mapping(entries) => entries.get(segment)?,
                Value::Sequence(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Render the fragment at a dotted path as YAML.
    ///
    /// ```rust
    /// use nodeconf_config::Config;
    ///
    /// let config = Config::parse("some:\n  other:\n    key: 3\n").unwrap();
    /// assert_eq!(config.query("some").unwrap(), "other:\n    key: 3\n");
    /// assert_eq!(config.query("some.other.key").unwrap(), "3\n");
    /// assert!(config.query("some.missing").is_err());
    /// ```
    pub fn query(&self, path: &str) -> Result<String> {
        if path.trim_start_matches('.').is_empty() {
            return Ok(mapping_to_yaml_string(&self.entries));
        }
        self.lookup(path)
            .map(to_yaml_string)
            .ok_or_else(|| ConfigError::PathNotFound {
                path: path.to_string(),
            })
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n\n{}",
            CLOUD_CONFIG_HEADER,
            mapping_to_yaml_string(&self.entries)
        )
    }
}

impl From<Mapping> for Config {
    fn from(entries: Mapping) -> Self {
        Self::from_mapping(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_document() {
        let config = Config::parse("#cloud-config\n").unwrap();
        assert!(config.is_empty());
        assert_eq!(config.to_string(), "#cloud-config\n\n{}\n");
    }

    #[test]
    fn test_parse_non_mapping() {
        let err = Config::parse("blip").unwrap_err();
        assert_eq!(err.to_string(), "configuration must be a mapping, found string");
    }

    #[test]
    fn test_display() {
        let config = Config::parse("name: Mario").unwrap();
        assert_eq!(config.to_string(), "#cloud-config\n\nname: Mario\n");
    }

    #[test]
    fn test_merge_config_different_keys() {
        let mut config = Config::parse("#cloud-config\nname: Mario").unwrap();
        config
            .merge_config(Config::parse("#cloud-config\nsurname: Bros").unwrap())
            .unwrap();
        assert_eq!(config.get("surname"), Some(&Value::from("Bros")));
        assert_eq!(config.len(), 2);
    }

    #[test]
    fn test_merge_config_reset_keys() {
        let mut config = Config::parse("#cloud-config\nlist:\n - 1\n - 2\nname: Mario").unwrap();
        config
            .merge_config(Config::parse("#cloud-config\nlist: null\nname: null").unwrap())
            .unwrap();
        assert_eq!(config.get("list"), Some(&Value::Sequence(vec![])));
        assert_eq!(config.get("name"), Some(&Value::from("")));
        assert_eq!(config.len(), 2);
    }

    #[test]
    fn test_merge_config_is_atomic() {
        let mut config = Config::parse("a: 1\nb: [x]").unwrap();
        let before = config.clone();
        let err = config
            .merge_config(Config::parse("a: 2\nb: {y: 1}").unwrap())
            .unwrap_err();
        assert!(matches!(err, ConfigError::KindMismatch { .. }));
        assert_eq!(config, before);
    }

    #[test]
    fn test_config_url() {
        let config = Config::parse("config_url: http://example.com/a.yaml").unwrap();
        assert_eq!(config.config_url(), Some("http://example.com/a.yaml"));

        assert_eq!(Config::parse("config_url: ''").unwrap().config_url(), None);
        assert_eq!(Config::parse("config_url: 3").unwrap().config_url(), None);
        assert_eq!(Config::new().config_url(), None);
    }

    #[test]
    fn test_query() {
        let config = Config::parse(
            "#cloud-config\nlocal_key_1: local_value_1\nlocal_key_2: false\nsome:\n  other:\n    key: 3\n",
        )
        .unwrap();

        assert_eq!(config.query("local_key_1").unwrap(), "local_value_1\n");
        assert_eq!(config.query("some").unwrap(), "other:\n    key: 3\n");
        assert_eq!(config.query("some.other").unwrap(), "key: 3\n");
        assert_eq!(config.query("some.other.key").unwrap(), "3\n");
        assert_eq!(config.query(".some.other.key").unwrap(), "3\n");
        assert_eq!(config.query("local_key_2").unwrap(), "false\n");
    }

    #[test]
    fn test_query_sequence_index() {
        let config = Config::parse("stages:\n  boot:\n    - name: one\n    - name: two\n").unwrap();
        assert_eq!(config.query("stages.boot.1.name").unwrap(), "two\n");
        assert!(config.query("stages.boot.2").is_err());
        assert!(config.query("stages.boot.x").is_err());
    }

    #[test]
    fn test_query_missing_path() {
        let config = Config::parse("name: Mario").unwrap();
        assert_eq!(
            config.query("name.first").unwrap_err(),
            ConfigError::PathNotFound {
                path: "name.first".to_string()
            }
        );
        assert!(config.query("surname").is_err());
    }

    #[test]
    fn test_query_whole_document() {
        let config = Config::parse("b: 1\na: 2").unwrap();
        assert_eq!(config.query("").unwrap(), "a: 2\nb: 1\n");
        assert_eq!(config.query(".").unwrap(), "a: 2\nb: 1\n");
    }
}
