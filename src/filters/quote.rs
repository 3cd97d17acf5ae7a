//! Quoting filters.
//!
//! Both filters quote the *string form* of a value: strings are taken
//! verbatim and anything else is written as a Python literal, so `none` is
//! `None`, booleans are `True`/`False` and `[1, "a"]` is `[1, 'a']`.
//!
//! ```jinja2
//! {{ "a\"b" | quote }}   -> "a\"b"
//! {{ "it's" | squote }}  -> "it's"
//! {{ none | quote }}     -> None
//! {{ none | quote(quote_none=true) }} -> "None"
//! ```

use std::fmt::Write;

use minijinja::value::{Kwargs, ValueKind};
use minijinja::{Error, Value};

use crate::filter;
use crate::filters::serialization::escape_json_str;
use crate::registry::Registry;

/// Rendered for `none` unless quoting is requested.
pub const NONE_LITERAL: &str = "None";

/// Register all quoting filters with the given registry.
pub fn register_filters(registry: &mut Registry) {
    registry.add("quote", &[], filter!(quote)).add("squote", &[], filter!(squote));
}

/// The string form used by the quoting filters.
///
/// Strings are taken verbatim; everything else gets its Python `repr`, so
/// `[1, "a"]` becomes `[1, 'a']`.
pub fn string_form(value: &Value) -> String {
    match value.as_str() {
        Some(text) => text.to_string(),
        None => python_repr(value),
    }
}

/// Python `repr` of a template value.
pub fn python_repr(value: &Value) -> String {
    match value.kind() {
        ValueKind::None => NONE_LITERAL.to_string(),
        ValueKind::Bool if value.is_true() => "True".to_string(),
        ValueKind::Bool => "False".to_string(),
        ValueKind::String => repr_str(value.as_str().unwrap_or_default()),
        ValueKind::Seq => {
            let items: Vec<String> = match value.try_iter() {
                Ok(items) => items.map(|item| python_repr(&item)).collect(),
                Err(_) => Vec::new(),
            };
            format!("[{}]", items.join(", "))
        }
        ValueKind::Map => {
            let items: Vec<String> = match value.try_iter() {
                Ok(keys) => keys
                    .map(|key| {
                        let item = value.get_item(&key).unwrap_or_default();
                        format!("{}: {}", python_repr(&key), python_repr(&item))
                    })
                    .collect(),
                Err(_) => Vec::new(),
            };
            format!("{{{}}}", items.join(", "))
        }
        _ => value.to_string(),
    }
}

/// Format characters and private-use code points, which `repr` escapes.
fn is_format_or_private(c: char) -> bool {
    matches!(
        c,
        '\u{ad}'
            | '\u{600}'..='\u{605}'
            | '\u{61c}'
            | '\u{6dd}'
            | '\u{70f}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206f}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
            | '\u{e000}'..='\u{f8ff}'
            | '\u{e0001}'
            | '\u{e0020}'..='\u{e007f}'
            | '\u{f0000}'..='\u{10ffff}'
    )
}

/// Whether `repr` keeps `c` as it is. The space is the only printable
/// whitespace.
fn is_printable(c: char) -> bool {
    c == ' ' || !(c.is_control() || c.is_whitespace() || is_format_or_private(c))
}

fn resolve_quote_none(quote_none: Option<bool>, kwargs: &Kwargs) -> Result<bool, Error> {
    let quote_none = kwargs.get::<Option<bool>>("quote_none")?.or(quote_none).unwrap_or(false);
    kwargs.assert_all_used()?;
    Ok(quote_none)
}

/// Quote a value with double quotes, escaping it as a JSON string.
pub fn quote(value: Value, quote_none: Option<bool>, kwargs: Kwargs) -> Result<String, Error> {
    let quote_none = resolve_quote_none(quote_none, &kwargs)?;
    if value.is_none() && !quote_none {
        return Ok(NONE_LITERAL.to_string());
    }
    Ok(escape_json_str(&string_form(&value)))
}

/// Quote a value with single quotes, escaping it as a Python string literal.
pub fn squote(value: Value, quote_none: Option<bool>, kwargs: Kwargs) -> Result<String, Error> {
    let quote_none = resolve_quote_none(quote_none, &kwargs)?;
    if value.is_none() && !quote_none {
        return Ok(NONE_LITERAL.to_string());
    }
    Ok(repr_str(&string_form(&value)))
}

/// Python `repr` of a string.
///
/// Single quotes are used unless the text contains a single quote and no
/// double quote.
pub fn repr_str(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                let code = c as u32;
                let _ = if code < 0x100 {
                    write!(out, "\\x{code:02x}")
                } else if code < 0x10000 {
                    write!(out, "\\u{code:04x}")
                } else {
                    write!(out, "\\U{code:08x}")
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
