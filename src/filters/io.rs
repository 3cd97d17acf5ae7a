//! File reading filters.
//!
//! # Available Filters
//!
//! - `read(path, mode="r")`: the whole file, as text or (with a `b` mode) bytes
//! - `readlines(path, mode="r")`: the lines of the file, terminators stripped
//!
//! Text mode decodes UTF-8 and translates `\r\n` and `\r` to `\n`.

use std::io;

use minijinja::value::Kwargs;
use minijinja::{Error, Value};

use crate::filter;
use crate::path::PanPath;
use crate::registry::Registry;

const DEFAULT_MODE: &str = "r";

/// Register all file reading filters with the given registry.
pub fn register_filters(registry: &mut Registry) {
    registry.add("read", &[], filter!(read)).add("readlines", &[], filter!(readlines));
}

/// File content as read by [`read_content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Bytes(Vec<u8>),
}

impl Content {
    /// Splits the content into lines without their terminators.
    pub fn lines(&self) -> Vec<Value> {
        match self {
            Self::Text(text) => splitlines(text).into_iter().map(Value::from).collect(),
            Self::Bytes(bytes) => split_byte_lines(bytes)
                .into_iter()
                .map(|line| Value::from_bytes(line.to_vec()))
                .collect(),
        }
    }
}

impl From<Content> for Value {
    fn from(content: Content) -> Self {
        match content {
            Content::Text(text) => Value::from(text),
            Content::Bytes(bytes) => Value::from_bytes(bytes),
        }
    }
}

/// Reads a file in the given `open()`-style mode.
///
/// # Errors
/// * `Error::IoError` if the file cannot be read, the mode is not a reading
///   mode, or text mode meets invalid UTF-8
pub fn read_content(path: &PanPath, mode: &str) -> crate::Result<Content> {
    if mode.contains(['w', 'a', 'x', '+']) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("mode '{mode}' does not open '{path}' for reading only"),
        )
        .into());
    }

    let bytes = path.read_bytes()?;
    if mode.contains('b') {
        return Ok(Content::Bytes(bytes));
    }
    let text =
        String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok(Content::Text(translate_newlines(text)))
}

fn translate_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Splits text at line boundaries, dropping the terminators.
///
/// A trailing terminator does not produce a trailing empty line.
pub fn splitlines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if !is_line_boundary(c) {
            continue;
        }
        lines.push(&text[start..idx]);
        start = idx + c.len_utf8();
        if c == '\r' && chars.peek().is_some_and(|(_, next)| *next == '\n') {
            chars.next();
            start += 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn split_byte_lines(bytes: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\n' => {
                lines.push(&bytes[start..idx]);
                start = idx + 1;
            }
            b'\r' => {
                lines.push(&bytes[start..idx]);
                if bytes.get(idx + 1) == Some(&b'\n') {
                    idx += 1;
                }
                start = idx + 1;
            }
            _ => {}
        }
        idx += 1;
    }
    if start < bytes.len() {
        lines.push(&bytes[start..]);
    }
    lines
}

fn resolve_mode(mode: Option<String>, kwargs: &Kwargs) -> Result<String, Error> {
    let mode = kwargs.get::<Option<String>>("mode")?.or(mode);
    if let Some(encoding) = kwargs.get::<Option<String>>("encoding")? {
        if !matches!(encoding.to_ascii_lowercase().as_str(), "utf-8" | "utf8") {
            return Err(Error::new(
                minijinja::ErrorKind::InvalidOperation,
                format!("unsupported encoding '{encoding}'"),
            ));
        }
    }
    kwargs.assert_all_used()?;
    Ok(mode.unwrap_or_else(|| DEFAULT_MODE.to_string()))
}

/// Read the contents of a file.
pub fn read(path: Value, mode: Option<String>, kwargs: Kwargs) -> Result<Value, Error> {
    let mode = resolve_mode(mode, &kwargs)?;
    Ok(read_content(&PanPath::from_value(&path), &mode)?.into())
}

/// Read the lines of a file.
pub fn readlines(path: Value, mode: Option<String>, kwargs: Kwargs) -> Result<Value, Error> {
    let mode = resolve_mode(mode, &kwargs)?;
    let content = read_content(&PanPath::from_value(&path), &mode)?;
    Ok(Value::from(content.lines()))
}
