//! Read-only filesystem query filters.
//!
//! None of these fail: type and existence checks answer `false`, and the stat
//! filters answer `-1`, whenever the path is missing, unreadable, or a cloud
//! path.
//!
//! # Available Filters
//!
//! - `isdir`, `isfile`, `islink`, `exists`
//! - `getsize`, `getmtime`, `getctime`, `getatime`
//! - `isempty`

use std::fs::Metadata;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use minijinja::value::Kwargs;
use minijinja::{Error, Value};

use crate::filter;
use crate::path::PanPath;
use crate::registry::Registry;

/// Returned by the stat filters when the stat call fails.
pub const STAT_SENTINEL: i64 = -1;

/// Register all filesystem filters with the given registry.
pub fn register_filters(registry: &mut Registry) {
    registry
        .add("isdir", &[], filter!(isdir))
        .add("isfile", &[], filter!(isfile))
        .add("islink", &[], filter!(islink))
        .add("exists", &[], filter!(exists))
        .add("getsize", &[], filter!(getsize))
        .add("getmtime", &[], filter!(getmtime))
        .add("getctime", &[], filter!(getctime))
        .add("getatime", &[], filter!(getatime))
        .add("isempty", &[], filter!(isempty));
}

/// Applies `field` to the metadata of `path`, or returns [`STAT_SENTINEL`].
fn stat_or_sentinel<F>(path: &Value, field: F) -> Value
where
    F: FnOnce(&Metadata) -> io::Result<Value>,
{
    let path = PanPath::from_value(path);
    let result = path.metadata().and_then(|metadata| Ok(field(&metadata)?));
    match result {
        Ok(value) => value,
        Err(err) => {
            debug!("Cannot stat '{path}': {err}");
            Value::from(STAT_SENTINEL)
        }
    }
}

/// Seconds since the Unix epoch, as a float.
fn epoch_seconds(time: SystemTime) -> io::Result<Value> {
    let elapsed = time.duration_since(UNIX_EPOCH).map_err(io::Error::other)?;
    Ok(Value::from(elapsed.as_secs_f64()))
}

pub fn isdir(path: Value) -> bool {
    PanPath::from_value(&path).is_dir()
}

pub fn isfile(path: Value) -> bool {
    PanPath::from_value(&path).is_file()
}

pub fn islink(path: Value) -> bool {
    PanPath::from_value(&path).is_symlink()
}

pub fn exists(path: Value) -> bool {
    PanPath::from_value(&path).exists()
}

/// Size of a file in bytes, or -1.
pub fn getsize(path: Value) -> Value {
    stat_or_sentinel(&path, |metadata| Ok(Value::from(metadata.len())))
}

/// Modification time in seconds since the epoch, or -1.
pub fn getmtime(path: Value) -> Value {
    stat_or_sentinel(&path, |metadata| epoch_seconds(metadata.modified()?))
}

/// Status change time (creation time on platforms without one) in seconds
/// since the epoch, or -1.
pub fn getctime(path: Value) -> Value {
    stat_or_sentinel(&path, ctime)
}

#[cfg(unix)]
fn ctime(metadata: &Metadata) -> io::Result<Value> {
    use std::os::unix::fs::MetadataExt;

    Ok(Value::from(metadata.ctime() as f64 + metadata.ctime_nsec() as f64 / 1e9))
}

#[cfg(not(unix))]
fn ctime(metadata: &Metadata) -> io::Result<Value> {
    epoch_seconds(metadata.created()?)
}

/// Access time in seconds since the epoch, or -1.
pub fn getatime(path: Value) -> Value {
    stat_or_sentinel(&path, |metadata| epoch_seconds(metadata.accessed()?))
}

/// Check if a file is empty.
///
/// # Arguments
/// * `ignore_ws` - Treat a file holding only whitespace as empty (default: true)
/// * `nonfile_as_empty` - What to answer when `path` is not a regular file
///   (default: false)
pub fn isempty(
    path: Value,
    ignore_ws: Option<bool>,
    nonfile_as_empty: Option<bool>,
    kwargs: Kwargs,
) -> Result<bool, Error> {
    let ignore_ws = kwargs.get::<Option<bool>>("ignore_ws")?.or(ignore_ws).unwrap_or(true);
    let nonfile_as_empty =
        kwargs.get::<Option<bool>>("nonfile_as_empty")?.or(nonfile_as_empty).unwrap_or(false);
    kwargs.assert_all_used()?;

    let path = PanPath::from_value(&path);
    if !path.is_file() {
        return Ok(nonfile_as_empty);
    }
    if !ignore_ws {
        return Ok(path.metadata().map(|metadata| metadata.len() == 0).unwrap_or(false));
    }

    match path.read_bytes() {
        Ok(content) => Ok(String::from_utf8_lossy(&content).trim().is_empty()),
        Err(err) => {
            debug!("Cannot read '{path}': {err}");
            Ok(false)
        }
    }
}
