//! Serialization filters for JSON and TOML, and the generic `config` loader.
//!
//! # Available Filters
//!
//! - `json_dumps` (`json`): dump a value as JSON, `{"a": 1}` style
//! - `json_loads`, `json_load`: parse JSON text or a JSON file
//! - `toml` (`toml_dumps`): dump a mapping as TOML, `none` written as `"null"`
//! - `toml_loads`, `toml_load`: parse TOML text or a TOML file, `"null"` read as `none`
//! - `config`: load a mapping, a file, or configuration text
//!
//! # Examples
//!
//! ```jinja2
//! {{ {"a": 1} | json }}
//! {{ 'a = "null"' | toml_loads }}
//! {{ config(in.configfile).section.key }}
//! {{ config('{"a": 1}', loader="json").a }}
//! ```

use std::io;

use minijinja::value::{Kwargs, ValueKind};
use minijinja::{Error, Value};
use serde::Serialize;
use serde_json::ser::Formatter;

use crate::config::{self as loaders, Loader};
use crate::filter;
use crate::path::PanPath;
use crate::registry::Registry;

/// Register all serialization filters with the given registry.
pub fn register_filters(registry: &mut Registry) {
    registry
        .add("json_dumps", &["json"], filter!(json_dumps))
        .add("json_load", &[], filter!(json_load))
        .add("json_loads", &[], filter!(json_loads))
        .add("toml", &["toml_dumps"], filter!(toml_dumps))
        .add("toml_load", &[], filter!(toml_load))
        .add("toml_loads", &[], filter!(toml_loads))
        .add("config", &[], filter!(config));
}

/// JSON formatting of Python's `json.dumps` defaults: `", "` and `": "`
/// separators, every non-ASCII character escaped as `\uXXXX`.
struct PythonFormatter;

impl Formatter for PythonFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units).iter() {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

fn to_python_json<T>(value: &T) -> crate::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PythonFormatter);
    value.serialize(&mut serializer)?;
    // The formatter only ever emits ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// A JSON string literal for `text`, non-ASCII escaped.
pub fn escape_json_str(text: &str) -> String {
    to_python_json(text).unwrap_or_default()
}

/// Dump a value to JSON.
///
/// Aliases: `json`
pub fn json_dumps(value: Value) -> Result<String, Error> {
    Ok(to_python_json(&value)?)
}

/// Load a JSON string to a value.
pub fn json_loads(text: &str) -> Result<Value, Error> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(crate::Error::from)?;
    Ok(Value::from_serialize(&value))
}

/// Load a JSON file.
pub fn json_load(path: Value) -> Result<Value, Error> {
    Ok(load_config(&path, Some("json"))?)
}

/// Dump a mapping to TOML. `none` is written as the string `"null"`.
///
/// Aliases: `toml_dumps`
pub fn toml_dumps(value: Value) -> Result<String, Error> {
    let value = serde_json::to_value(&value).map_err(crate::Error::from)?;
    let text = toml::to_string(&loaders::null_to_sentinel(value)).map_err(crate::Error::from)?;
    Ok(text)
}

/// Load a TOML string to a value. `"null"` is loaded as `none`.
pub fn toml_loads(text: &str) -> Result<Value, Error> {
    Ok(Value::from_serialize(&Loader::Toml.parse(text)?))
}

/// Load a TOML file. `"null"` is loaded as `none`.
pub fn toml_load(path: Value) -> Result<Value, Error> {
    Ok(load_config(&path, Some("toml"))?)
}

/// Get a configuration mapping.
///
/// # Arguments
/// * `source` - A mapping (returned as is), a path to a configuration file,
///   or configuration text
/// * `loader` - `"json"` or `"toml"`; required when `source` is text, and
///   overrides extension detection (`"yaml"` also allowed) for files
pub fn config(source: Value, loader: Option<String>, kwargs: Kwargs) -> Result<Value, Error> {
    let loader = kwargs.get::<Option<String>>("loader")?.or(loader);
    kwargs.assert_all_used()?;
    Ok(load_config(&source, loader.as_deref())?)
}

fn load_config(source: &Value, loader: Option<&str>) -> crate::Result<Value> {
    if source.kind() == ValueKind::Map {
        return Ok(source.clone());
    }

    if source.downcast_object_ref::<PanPath>().is_none() {
        let Some(text) = source.as_str() else {
            return Err(crate::Error::ConfigError(format!(
                "Cannot load configuration from a value of type {}",
                source.kind()
            )));
        };
        if !PanPath::new(text).is_file() {
            let loader = match loader {
                Some("toml") => Loader::Toml,
                Some("json") => Loader::Json,
                other => {
                    return Err(crate::Error::UnknownLoader {
                        loader: other.unwrap_or("None").to_string(),
                    })
                }
            };
            return Ok(Value::from_serialize(&loader.parse(text)?));
        }
    }

    let path = PanPath::from_value(source);
    let loader = loader.map(str::parse::<Loader>).transpose()?;
    Ok(Value::from_serialize(&loaders::load_file(path.local("load")?, loader)?))
}
