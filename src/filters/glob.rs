//! Globbing filters.
//!
//! The pattern is built from every argument after the base path, joined with
//! `/`, and matched against paths relative to the base:
//!
//! ```jinja2
//! {{ glob(in.dir, "*.txt") }}             -> sorted list of matches
//! {{ glob(in.dir, "**", "*.bam") }}       -> matches at any depth
//! {{ glob0(in.dir, "sample_*.fq.gz") }}   -> first match, fails if none
//! ```
//!
//! `*`, `?` and `[...]` never match across `/`. Symlinked directories are
//! followed.

use std::path::Path;

use globset::GlobBuilder;
use log::debug;
use minijinja::value::Rest;
use minijinja::{Error, Value};
use walkdir::WalkDir;

use crate::filter;
use crate::path::PanPath;
use crate::registry::Registry;

/// Register all glob filters with the given registry.
pub fn register_filters(registry: &mut Registry) {
    registry.add("glob", &[], filter!(glob)).add("glob0", &[], filter!(glob0));
}

/// Matches `pattern` below `base`, returning sorted `base`-joined paths.
///
/// A missing base directory matches nothing.
///
/// # Errors
/// * `Error::PatternError` if the pattern is empty or absolute
/// * `Error::GlobError` if the pattern does not compile
/// * `Error::CloudPathError` for cloud base paths
pub fn glob_paths(base: &PanPath, pattern: &str) -> crate::Result<Vec<String>> {
    if pattern.is_empty() {
        return Err(crate::Error::PatternError {
            pattern: pattern.to_string(),
            reason: "the pattern is empty",
        });
    }
    if pattern.starts_with('/') {
        return Err(crate::Error::PatternError {
            pattern: pattern.to_string(),
            reason: "non-relative patterns are unsupported",
        });
    }

    let root = base.local("glob")?;
    let root = if root.as_os_str().is_empty() { Path::new(".") } else { root };
    let matcher = GlobBuilder::new(pattern).literal_separator(true).build()?.compile_matcher();
    let max_depth = if pattern.contains("**") {
        usize::MAX
    } else {
        pattern.split('/').filter(|part| !part.is_empty()).count()
    };

    if !root.is_dir() {
        debug!("Glob base '{}' is not a directory", root.display());
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).min_depth(1).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Skipping unreadable entry while globbing: {err}");
                continue;
            }
        };
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if matcher.is_match(relative) {
            matches.push(base.join(&relative.to_string_lossy()).to_string());
        }
    }
    matches.sort();
    debug!("Pattern '{pattern}' matched {} paths below '{base}'", matches.len());
    Ok(matches)
}

fn join_pattern(segments: &[Value]) -> String {
    segments.iter().map(Value::to_string).collect::<Vec<_>>().join("/")
}

/// Glob a path. The returned paths are sorted.
pub fn glob(base: Value, segments: Rest<Value>) -> Result<Vec<String>, Error> {
    Ok(glob_paths(&PanPath::from_value(&base), &join_pattern(&segments))?)
}

/// Glob a path and return the first sorted match. Fails if nothing matches.
pub fn glob0(base: Value, segments: Rest<Value>) -> Result<String, Error> {
    let base = PanPath::from_value(&base);
    let pattern = join_pattern(&segments);
    let first = glob_paths(&base, &pattern)?.into_iter().next();
    first.ok_or_else(|| {
        crate::Error::NoMatchError { pattern: base.join(&pattern).to_string() }.into()
    })
}
