//! Configuration loading for pipen-filters.
//! This module parses JSON, TOML and YAML configuration text and files into
//! `serde_json::Value` trees.
//!
//! TOML has no null value, so configurations written through `toml_dumps`
//! store `none` as the string `"null"`; TOML loaded here maps that string back
//! to null at any depth.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::error::{Error, Result};

/// String standing in for null in TOML documents.
pub const NULL_SENTINEL: &str = "null";

/// Configuration formats understood by the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    Json,
    Toml,
    Yaml,
}

impl FromStr for Loader {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(Error::UnknownLoader { loader: other.to_string() }),
        }
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Toml => write!(f, "toml"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

impl Loader {
    /// Picks the loader from a file extension.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the extension is missing or not supported
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(Error::ConfigError(format!(
                "Cannot detect configuration format of '{}' (supported: .json, .toml, .yaml, .yml)",
                path.display()
            ))),
        }
    }

    /// Parses configuration text.
    pub fn parse(&self, content: &str) -> Result<serde_json::Value> {
        match self {
            Self::Json => Ok(serde_json::from_str(content)?),
            Self::Toml => {
                let table: toml::Table = toml::from_str(content)?;
                Ok(toml_to_json(toml::Value::Table(table)))
            }
            Self::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }
}

/// Loads a configuration file.
///
/// # Arguments
/// * `path` - Path to the configuration file
/// * `loader` - Format to use; detected from the extension when `None`
///
/// # Errors
/// * `Error::IoError` if the file cannot be read
/// * `Error::ConfigError` if the format cannot be detected
/// * A parse error of the chosen format
pub fn load_file<P: AsRef<Path>>(path: P, loader: Option<Loader>) -> Result<serde_json::Value> {
    let path = path.as_ref();
    let loader = match loader {
        Some(loader) => loader,
        None => Loader::from_path(path)?,
    };
    debug!("Loading {loader} configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    loader.parse(&content)
}

/// Converts a TOML tree to JSON, turning `"null"` strings into nulls.
pub fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) if s == NULL_SENTINEL => serde_json::Value::Null,
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::Value::from(i),
        toml::Value::Float(f) => serde_json::Value::from(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect(),
        ),
    }
}

/// Replaces every null with the `"null"` string so the tree can be written as TOML.
pub fn null_to_sentinel(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Null => serde_json::Value::String(NULL_SENTINEL.to_string()),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(null_to_sentinel).collect())
        }
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter().map(|(k, v)| (k, null_to_sentinel(v))).collect(),
        ),
        other => other,
    }
}
