//! pipen-filters is a catalog of template filters for pipeline templating.
//! It provides path decomposition with extension ignore-lists, quoting,
//! JSON/TOML serialization, file reading, globbing, regex substitution and
//! filesystem queries, plus the plugin hook that registers them with a host.

/// Command-line interface module for the pipen-filters binary
pub mod cli;

/// Configuration loading for the `config` filters and CLI contexts
/// Supports JSON, TOML and YAML formats
pub mod config;

/// Error types and handling for pipen-filters
pub mod error;

/// The filter functions, grouped by category
pub mod filters;

/// Local and cloud path handling
pub mod path;

/// Plugin lifecycle hook merging the catalog into a host configuration
pub mod plugin;

/// The name → filter registry
pub mod registry;

/// Template rendering with the catalog installed
pub mod renderer;

/// Extension splitting with ignore-lists
pub mod splitext;

pub use error::{Error, Result};
pub use minijinja;
