//! Error handling for pipen-filters.
//! Defines the crate error type, the result alias used throughout the crate,
//! and the conversion that surfaces crate errors inside template evaluation.

use std::io;
use thiserror::Error;

/// Custom error types for filter operations.
///
/// This enum represents every failure a filter is allowed to surface.
/// Filesystem queries never produce one of these; they degrade to sentinels.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors raised by the template engine
    #[error("Template error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    /// Represents invalid input to the configuration loaders
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// A loader name other than the supported ones was requested
    #[error("Unknown loader: {loader}.")]
    UnknownLoader { loader: String },

    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}.")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}.")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("YAML error: {0}.")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid glob pattern: {0}.")]
    GlobError(#[from] globset::Error),

    /// Glob patterns must be non-empty and relative to the base path
    #[error("Unacceptable glob pattern '{pattern}': {reason}.")]
    PatternError { pattern: String, reason: &'static str },

    #[error("Invalid regular expression: {0}.")]
    RegexError(#[from] regex::Error),

    /// `glob0` found nothing to return
    #[error("No paths matched pattern '{pattern}'.")]
    NoMatchError { pattern: String },

    /// `readlink` was called on something that is not a symbolic link
    #[error("'{path}' is not a symbolic link.")]
    NotASymlinkError { path: String },

    /// Cloud paths can be decomposed but not accessed
    #[error("Cannot {operation} cloud path '{path}': no storage backend available.")]
    CloudPathError { operation: &'static str, path: String },
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for minijinja::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::MinijinjaError(inner) => inner,
            other => {
                let msg = other.to_string();
                minijinja::Error::new(minijinja::ErrorKind::InvalidOperation, msg)
                    .with_source(other)
            }
        }
    }
}

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
