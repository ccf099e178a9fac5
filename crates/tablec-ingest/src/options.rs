//! Process-wide import configuration.
//!
//! Options are plain strings addressed as `namespace.key`, e.g.
//! `tableImporter.filePattern`. They come from `key=value` pairs on the
//! command line and/or a TOML file whose tables flatten into the same keys.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Option namespace read by the table importers.
pub const IMPORTER_NAMESPACE: &str = "tableImporter";

pub const KEY_IMPORTER_NAME: &str = "name";
pub const KEY_FILE_PATTERN: &str = "filePattern";
pub const KEY_NAMESPACE_FORMAT: &str = "tableNamespaceFormat";
pub const KEY_NAME_FORMAT: &str = "tableNameFormat";
pub const KEY_VALUE_TYPE_NAME_FORMAT: &str = "valueTypeNameFormat";

/// String options keyed by `namespace.key`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOptions {
    values: BTreeMap<String, String>,
}

impl EnvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `key=value` pairs. Later pairs override earlier ones.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::new();
        for pair in pairs {
            let (key, value) = parse_pair(pair.as_ref())?;
            options.values.insert(key, value);
        }
        Ok(options)
    }

    /// Build from a TOML document.
    ///
    /// ```toml
    /// [tableImporter]
    /// filePattern = "#(.*)"
    /// ```
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let table: toml::Table = text.parse().map_err(|e: toml::de::Error| {
            IngestError::OptionsFile {
                path: origin.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        let mut options = Self::new();
        flatten_toml("", &table, &mut options.values);
        Ok(options)
    }

    /// Load a TOML options file from disk.
    pub fn load_toml(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| IngestError::OptionsFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text, path)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(&mut self, other: EnvOptions) {
        self.values.extend(other.values);
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<&str> {
        self.values
            .get(&format!("{namespace}.{key}"))
            .map(String::as_str)
    }

    pub fn get_or_default<'a>(&'a self, namespace: &str, key: &str, default: &'a str) -> &'a str {
        self.get(namespace, key).unwrap_or(default)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn parse_pair(raw: &str) -> Result<(String, String)> {
    let invalid = |reason: &str| IngestError::InvalidOption {
        raw: raw.to_string(),
        reason: reason.to_string(),
    };
    let (key, value) = raw.split_once('=').ok_or_else(|| invalid("expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(invalid("empty key"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn flatten_toml(prefix: &str, table: &toml::Table, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten_toml(&full_key, inner, out),
            toml::Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}

/// Everything an importer may read: the data root and the option map.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub data_root: PathBuf,
    pub options: EnvOptions,
}

impl ImportConfig {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            options: EnvOptions::new(),
        }
    }

    pub fn with_options(mut self, options: EnvOptions) -> Self {
        self.options = options;
        self
    }

    /// Importer option with a fallback.
    pub fn importer_option<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options
            .get_or_default(IMPORTER_NAMESPACE, key, default)
    }

    /// Name of the importer strategy to run.
    pub fn importer_name(&self) -> &str {
        self.importer_option(KEY_IMPORTER_NAME, "default")
    }
}
