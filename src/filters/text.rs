//! Text filters.
//!
//! # Available Filters
//!
//! - `regex_replace`: substitute pattern matches, Python `re.sub` style
//! - `slugify`: turn text into a URL- and filename-friendly slug
//!
//! # Examples
//!
//! ```jinja2
//! {{ "a1b22" | regex_replace("\\d+", "#") }}           -> a#b#
//! {{ "John Smith" | regex_replace("(\\w+) (\\w+)", "\\2, \\1") }}
//! {{ "Hello World!" | slugify }}                       -> hello-world
//! {{ "Hello World!" | slugify(separator="_") }}        -> hello_world
//! ```

use deunicode::deunicode;
use minijinja::value::{Kwargs, Rest};
use minijinja::{Error, Value};
use regex::{Regex, RegexBuilder};

use crate::filter;
use crate::registry::Registry;

/// `re.IGNORECASE`
pub const IGNORECASE: i64 = 2;
/// `re.MULTILINE`
pub const MULTILINE: i64 = 8;
/// `re.DOTALL`
pub const DOTALL: i64 = 16;
/// `re.VERBOSE`
pub const VERBOSE: i64 = 64;

const DEFAULT_SEPARATOR: &str = "-";

/// Register all text filters with the given registry.
pub fn register_filters(registry: &mut Registry) {
    registry.add("regex_replace", &[], filter!(regex_replace)).add("slugify", &[], filter!(slugify));
}

/// Compiles `pattern` with the regex flags set in `flags`.
pub fn compile(pattern: &str, flags: i64) -> crate::Result<Regex> {
    Ok(RegexBuilder::new(pattern)
        .case_insensitive(flags & IGNORECASE != 0)
        .multi_line(flags & MULTILINE != 0)
        .dot_matches_new_line(flags & DOTALL != 0)
        .ignore_whitespace(flags & VERBOSE != 0)
        .build()?)
}

/// Rewrites a backslash-style replacement template into `$`-style syntax.
///
/// `\1` and `\g<name>` become group references, `\n`, `\t`, `\r`, `\f`,
/// `\v`, `\a` and `\\` become the characters they name, `\0` is a NUL,
/// and a bare `$` is kept literal.
pub fn translate_replacement(repl: &str) -> String {
    let mut out = String::with_capacity(repl.len());
    let mut chars = repl.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => match chars.next() {
                None => out.push('\\'),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('f') => out.push('\x0c'),
                Some('v') => out.push('\x0b'),
                Some('a') => out.push('\x07'),
                Some('0') => out.push('\0'),
                Some('g') if chars.peek() == Some(&'<') => {
                    chars.next();
                    let group: String = chars.by_ref().take_while(|c| *c != '>').collect();
                    out.push_str("${");
                    out.push_str(&group);
                    out.push('}');
                }
                Some(digit) if digit.is_ascii_digit() => {
                    let mut group = String::from(digit);
                    if let Some(next) = chars.next_if(char::is_ascii_digit) {
                        group.push(next);
                    }
                    out.push_str("${");
                    out.push_str(&group);
                    out.push('}');
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
            },
            c => out.push(c),
        }
    }
    out
}

/// Replaces the first `count` matches of `pattern` (all when `count` is 0).
pub fn replace(text: &str, pattern: &str, repl: &str, count: usize, flags: i64) -> crate::Result<String> {
    let regex = compile(pattern, flags)?;
    let replacement = translate_replacement(repl);
    Ok(regex.replacen(text, count, replacement.as_str()).into_owned())
}

/// Replace matches of a pattern.
///
/// Takes `count` and `flags` positionally after `repl`, or as keywords.
///
/// # Arguments
/// * `count` - Maximum number of replacements, 0 for all
/// * `flags` - Sum of `re` flag values, e.g. `2` for case-insensitive
pub fn regex_replace(
    input: &str,
    pattern: &str,
    repl: &str,
    positional: Rest<i64>,
    kwargs: Kwargs,
) -> Result<String, Error> {
    if positional.len() > 2 {
        return Err(Error::new(
            minijinja::ErrorKind::TooManyArguments,
            "regex_replace takes at most count and flags after the replacement",
        ));
    }
    let count = kwargs.get::<Option<i64>>("count")?.or(positional.first().copied()).unwrap_or(0);
    let flags = kwargs.get::<Option<i64>>("flags")?.or(positional.get(1).copied()).unwrap_or(0);
    kwargs.assert_all_used()?;
    let count = usize::try_from(count).map_err(|_| {
        Error::new(minijinja::ErrorKind::InvalidOperation, "count must not be negative")
    })?;
    Ok(replace(input, pattern, repl, count, flags)?)
}

/// Slugify options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugOptions {
    pub separator: String,
    pub lowercase: bool,
    pub max_length: usize,
}

impl Default for SlugOptions {
    fn default() -> Self {
        Self { separator: DEFAULT_SEPARATOR.to_string(), lowercase: true, max_length: 0 }
    }
}

fn drop_digit_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|(idx, c)| {
            !(**c == ','
                && *idx > 0
                && chars[idx - 1].is_ascii_digit()
                && chars.get(idx + 1).is_some_and(char::is_ascii_digit))
        })
        .map(|(_, c)| *c)
        .collect()
}

fn is_slug_char(c: char, lowercase: bool) -> bool {
    c == '-' || c.is_ascii_digit() || c.is_ascii_lowercase() || (!lowercase && c.is_ascii_uppercase())
}

/// Builds a slug from `text`.
///
/// Apostrophes separate words, and non-ASCII text is transliterated to ASCII
/// before anything outside `[a-z0-9]` (`[A-Za-z0-9]` when not lowercasing)
/// collapses into the separator.
pub fn slug(text: &str, options: &SlugOptions) -> String {
    let text = deunicode(&text.replace('\'', DEFAULT_SEPARATOR));
    let text = if options.lowercase { text.to_lowercase() } else { text };
    let text = drop_digit_commas(&text);

    let mut collapsed = String::with_capacity(text.len());
    for c in text.chars() {
        let c = if is_slug_char(c, options.lowercase) { c } else { '-' };
        if !(c == '-' && collapsed.ends_with('-')) {
            collapsed.push(c);
        }
    }
    let mut slug = collapsed.trim_matches('-');

    if options.max_length > 0 && slug.len() > options.max_length {
        // Only ASCII is left at this point.
        slug = slug[..options.max_length].trim_matches('-');
    }

    if options.separator == DEFAULT_SEPARATOR {
        slug.to_string()
    } else {
        slug.replace(DEFAULT_SEPARATOR, &options.separator)
    }
}

/// Slugify a string.
///
/// # Arguments
/// * `separator` - Joins the words, `-` by default
/// * `lowercase` - Lowercase the slug, true by default
/// * `max_length` - Truncate the slug, 0 for no limit
pub fn slugify(
    input: Value,
    separator: Option<String>,
    lowercase: Option<bool>,
    max_length: Option<usize>,
    kwargs: Kwargs,
) -> Result<String, Error> {
    let defaults = SlugOptions::default();
    let options = SlugOptions {
        separator: kwargs
            .get::<Option<String>>("separator")?
            .or(separator)
            .unwrap_or(defaults.separator),
        lowercase: kwargs.get::<Option<bool>>("lowercase")?.or(lowercase).unwrap_or(true),
        max_length: kwargs.get::<Option<usize>>("max_length")?.or(max_length).unwrap_or(0),
    };
    kwargs.assert_all_used()?;
    Ok(slug(&input.to_string(), &options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_replacement() {
        assert_eq!(translate_replacement(r"\2, \1"), "${2}, ${1}");
        assert_eq!(translate_replacement(r"\g<word>-\g<1>"), "${word}-${1}");
        assert_eq!(translate_replacement(r"a\nb\\c"), "a\nb\\c");
        assert_eq!(translate_replacement("$5"), "$$5");
        assert_eq!(translate_replacement(r"\12x"), "${12}x");
    }

    #[test]
    fn test_replace_count_and_flags() {
        assert_eq!(replace("aAaA", "a", "x", 0, 0).unwrap(), "xAxA");
        assert_eq!(replace("aAaA", "a", "x", 0, IGNORECASE).unwrap(), "xxxx");
        assert_eq!(replace("aAaA", "a", "x", 2, IGNORECASE).unwrap(), "xxaA");
        assert_eq!(replace("a\nb", "^b", "c", 0, MULTILINE).unwrap(), "a\nc");
        assert!(replace("x", "(", "", 0, 0).is_err());
    }

    #[test]
    fn test_slug() {
        let options = SlugOptions::default();
        assert_eq!(slug("Hello World!", &options), "hello-world");
        assert_eq!(slug("  --Spaced  Out--  ", &options), "spaced-out");
        assert_eq!(slug("It's 1,000 times", &options), "it-s-1000-times");
        assert_eq!(slug("C'est déjà l'été.", &options), "c-est-deja-l-ete");
        assert_eq!(slug("café", &options), "cafe");
        assert_eq!(slug("a, b", &options), "a-b");
    }

    #[test]
    fn test_slug_options() {
        let options = SlugOptions { separator: "_".to_string(), ..SlugOptions::default() };
        assert_eq!(slug("Hello World", &options), "hello_world");

        let options = SlugOptions { lowercase: false, ..SlugOptions::default() };
        assert_eq!(slug("Hello World", &options), "Hello-World");

        let options = SlugOptions { max_length: 6, ..SlugOptions::default() };
        assert_eq!(slug("hello world", &options), "hello");

        let options = SlugOptions { max_length: 7, ..SlugOptions::default() };
        assert_eq!(slug("hello world", &options), "hello-w");
    }
}
