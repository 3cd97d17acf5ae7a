//! Path decomposition filters.
//!
//! # Available Filters
//!
//! - `dirname`, `basename`, `commonprefix`, `joinpaths` (`joinpath`), `as_path`
//! - `realpath`, `readlink`
//! - `ext` (`suffix`), `ext0` (`suffix0`), `prefix`, `prefix0`,
//!   `filename` (`fn`, `stem`), `filename0` (`fn0`, `stem0`)
//!
//! The extension filters take an ignore-list (`ignore`, a string or a list of
//! extensions with or without leading dots) and a `recursive` flag, either
//! positionally or as keyword arguments:
//!
//! ```jinja2
//! {{ "/a/b.txt.gz" | ext }}                                   -> .gz
//! {{ "/a/b.txt.gz" | ext("gz") }}                             -> .txt
//! {{ "/a/b.x.txt.gz" | ext(ignore=["gz", "txt"], recursive=true) }} -> .x
//! ```

use minijinja::value::{Kwargs, Rest};
use minijinja::{Error, Value};

use crate::filter;
use crate::path::PanPath;
use crate::registry::Registry;
use crate::splitext::{SplitOptions, EXT_SEP};

/// Register all path filters with the given registry.
pub fn register_filters(registry: &mut Registry) {
    registry
        .add("realpath", &[], filter!(realpath))
        .add("readlink", &[], filter!(readlink))
        .add("commonprefix", &[], filter!(commonprefix))
        .add("dirname", &[], filter!(dirname))
        .add("basename", &[], filter!(basename))
        .add("ext", &["suffix"], filter!(ext))
        .add("ext0", &["suffix0"], filter!(ext0))
        .add("prefix", &[], filter!(prefix))
        .add("prefix0", &[], filter!(prefix0))
        .add("filename", &["fn", "stem"], filter!(filename))
        .add("filename0", &["fn0", "stem0"], filter!(filename0))
        .add("joinpaths", &["joinpath"], filter!(joinpaths))
        .add("as_path", &[], filter!(as_path));
}

/// Resolves `ignore`/`recursive` from positional and keyword arguments.
/// Keyword arguments win over positional ones.
fn split_options(
    ignore: Option<Value>,
    recursive: Option<bool>,
    kwargs: &Kwargs,
) -> Result<SplitOptions, Error> {
    let ignore = kwargs.get::<Option<Value>>("ignore")?.or(ignore);
    let recursive = kwargs.get::<Option<bool>>("recursive")?.or(recursive).unwrap_or(false);
    kwargs.assert_all_used()?;

    let ignore = match ignore {
        None => Vec::new(),
        Some(value) => match value.as_str() {
            Some(single) => vec![single.to_string()],
            None => value.try_iter()?.map(|ext| ext.to_string()).collect(),
        },
    };
    Ok(SplitOptions::new(ignore, recursive))
}

fn split(
    path: &Value,
    ignore: Option<Value>,
    recursive: Option<bool>,
    kwargs: &Kwargs,
) -> Result<(String, String), Error> {
    let options = split_options(ignore, recursive, kwargs)?;
    let path = path.to_string();
    let (kept, stripped) = options.split(&path);
    Ok((kept.to_string(), stripped.to_string()))
}

/// Get the real path of a path, with symlinks and relative segments resolved.
pub fn realpath(path: Value) -> Result<String, Error> {
    Ok(PanPath::from_value(&path).resolve()?.to_string())
}

/// Get the target of a symbolic link. Fails if `path` is not a symlink.
pub fn readlink(path: Value) -> Result<String, Error> {
    Ok(PanPath::from_value(&path).read_link()?.to_string())
}

/// Get the common prefix of a set of paths.
///
/// Only the basenames are compared unless `basename_only=false` is given.
///
/// # Examples
/// ```jinja2
/// {{ commonprefix("/a/b/abc.txt", "/a/b/abc.png") }}                      -> abc.
/// {{ commonprefix("/a/b/abc.txt", "/a/b/abc.png", basename_only=false) }} -> /a/b/abc.
/// ```
pub fn commonprefix(paths: Rest<Value>, kwargs: Kwargs) -> Result<String, Error> {
    let basename_only = kwargs.get::<Option<bool>>("basename_only")?.unwrap_or(true);
    kwargs.assert_all_used()?;

    let paths: Vec<String> = paths
        .iter()
        .map(|path| if basename_only { PanPath::from_value(path).name() } else { path.to_string() })
        .collect();
    Ok(common_prefix(&paths).to_string())
}

/// Longest common leading substring, compared character by character.
pub fn common_prefix<S: AsRef<str>>(strings: &[S]) -> &str {
    let Some((first, rest)) = strings.split_first() else {
        return "";
    };
    let first = first.as_ref();
    let end = rest.iter().fold(first.len(), |end, other| {
        let mut other = other.as_ref().chars();
        first[..end]
            .char_indices()
            .find(|(_, c)| other.next() != Some(*c))
            .map_or(end, |(idx, _)| idx)
    });
    &first[..end]
}

/// Get the directory name of a path, e.g. `/a/b/c.txt => /a/b`.
pub fn dirname(path: Value) -> String {
    PanPath::from_value(&path).parent().to_string()
}

/// Get the basename of a path, e.g. `/a/b/c.txt => c.txt`.
pub fn basename(path: Value) -> String {
    PanPath::from_value(&path).name()
}

/// Get the extension of a file, with its leading dot, e.g. `/a/b/c.txt => .txt`.
///
/// Aliases: `suffix`
pub fn ext(
    path: Value,
    ignore: Option<Value>,
    recursive: Option<bool>,
    kwargs: Kwargs,
) -> Result<String, Error> {
    Ok(split(&path, ignore, recursive, &kwargs)?.1)
}

/// Get the extension of a file without the leading dot, e.g. `/a/b/c.txt => txt`.
///
/// Aliases: `suffix0`
pub fn ext0(
    path: Value,
    ignore: Option<Value>,
    recursive: Option<bool>,
    kwargs: Kwargs,
) -> Result<String, Error> {
    let ext = ext(path, ignore, recursive, kwargs)?;
    Ok(ext.strip_prefix(EXT_SEP).unwrap_or(&ext).to_string())
}

/// Get the path without its extension, e.g. `/a/b/c.d.txt => /a/b/c.d`.
pub fn prefix(
    path: Value,
    ignore: Option<Value>,
    recursive: Option<bool>,
    kwargs: Kwargs,
) -> Result<String, Error> {
    Ok(split(&path, ignore, recursive, &kwargs)?.0)
}

/// Get the path with everything from the first dot of the file name removed,
/// e.g. `/a/b/c.d.txt => /a/b/c`.
pub fn prefix0(
    path: Value,
    ignore: Option<Value>,
    recursive: Option<bool>,
    kwargs: Kwargs,
) -> Result<String, Error> {
    let parent = PanPath::from_value(&path).parent();
    let stem = filename0(path, ignore, recursive, kwargs)?;
    Ok(parent.join(&stem).to_string())
}

/// Get the file name without its extension, e.g. `/a/b/c.d.txt => c.d`.
///
/// Aliases: `fn`, `stem`
pub fn filename(
    path: Value,
    ignore: Option<Value>,
    recursive: Option<bool>,
    kwargs: Kwargs,
) -> Result<String, Error> {
    let (kept, _) = split(&path, ignore, recursive, &kwargs)?;
    Ok(PanPath::new(&kept).name())
}

/// Get the file name up to its first dot, e.g. `/a/b/c.d.txt => c`.
///
/// Aliases: `fn0`, `stem0`
pub fn filename0(
    path: Value,
    ignore: Option<Value>,
    recursive: Option<bool>,
    kwargs: Kwargs,
) -> Result<String, Error> {
    let name = filename(path, ignore, recursive, kwargs)?;
    Ok(name.split(EXT_SEP).next().unwrap_or_default().to_string())
}

/// Join path segments, e.g. `joinpaths("a", "b") => a/b`.
///
/// Aliases: `joinpath`
pub fn joinpaths(first: Value, rest: Rest<Value>) -> String {
    rest.iter()
        .fold(PanPath::from_value(&first), |path, segment| path.join(&segment.to_string()))
        .to_string()
}

/// Convert a path to a path object with `name`, `stem`, `suffix`, `parent`,
/// `scheme` and `is_cloud` attributes. Renders as the path itself.
pub fn as_path(path: Value) -> Value {
    Value::from_object(PanPath::from_value(&path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefix() {
        assert_eq!(common_prefix(&["abc.txt", "abc.png"]), "abc.");
        assert_eq!(common_prefix(&["abc", "ab"]), "ab");
        assert_eq!(common_prefix(&["ab", "abc"]), "ab");
        assert_eq!(common_prefix(&["x", "y"]), "");
        assert_eq!(common_prefix::<&str>(&[]), "");
        assert_eq!(common_prefix(&["only"]), "only");
        assert_eq!(common_prefix(&["héllo", "hélp"]), "hél");
    }
}
