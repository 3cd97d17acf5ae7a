//! The filter catalog.
//!
//! Filters are organized into categories:
//!
//! - **path**: path decomposition and extension splitting
//! - **fs**: read-only filesystem queries that never fail
//! - **quote**: double and single quoting
//! - **serialization**: JSON/TOML dumping and loading, the generic `config` loader
//! - **glob**: sorted globbing
//! - **io**: reading files and lines
//! - **text**: regex substitution and slugs
//!
//! # Usage
//!
//! ```jinja2
//! {{ in.infile | stem }}.bam
//! {{ in.infile | prefix0(ignore=["gz"], recursive=true) }}
//! {{ glob0(in.dir, "*.txt") | read }}
//! ```

pub mod fs;
pub mod glob;
pub mod io;
pub mod path;
pub mod quote;
pub mod serialization;
pub mod text;

use crate::registry::Registry;

/// Builds the registry holding every filter of the catalog.
///
/// Most callers want the shared instance from [`crate::registry::registry`].
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    path::register_filters(&mut registry);
    fs::register_filters(&mut registry);
    quote::register_filters(&mut registry);
    serialization::register_filters(&mut registry);
    glob::register_filters(&mut registry);
    io::register_filters(&mut registry);
    text::register_filters(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_documented_name_is_registered() {
        let registry = default_registry();
        for name in [
            "realpath", "readlink", "commonprefix", "dirname", "basename", "ext", "suffix",
            "ext0", "suffix0", "prefix", "prefix0", "filename", "fn", "stem", "filename0", "fn0",
            "stem0", "joinpaths", "joinpath", "as_path", "isdir", "isfile", "islink", "exists",
            "getsize", "getmtime", "getctime", "getatime", "isempty", "quote", "squote",
            "json_dumps", "json", "json_load", "json_loads", "toml", "toml_dumps", "toml_load",
            "toml_loads", "config", "glob", "glob0", "read", "readlines", "regex_replace",
            "slugify",
        ] {
            assert!(registry.contains(name), "missing filter {name}");
        }
        assert_eq!(registry.len(), 46);
    }
}
