//! Path handles for local filesystem paths and cloud-style URIs.
//!
//! Cloud paths (`scheme://bucket/key`) can be decomposed and joined like local
//! paths. They are never accessed: queries answer `false`, and operations that
//! need the object itself return [`Error::CloudPathError`].

use std::fmt;
use std::fs::{self, Metadata};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use log::debug;
use minijinja::value::{Object, ObjectRepr};
use minijinja::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::splitext::splitext;

const SCHEME_SEP: &str = "://";

/// A local path or a cloud-style URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanPath {
    /// Local filesystem path, normalized (no `.` components, no repeated separators)
    Local(PathBuf),
    /// `scheme://bucket/key`, with `key` holding no leading or repeated `/`
    Cloud { scheme: String, bucket: String, key: String },
}

impl PanPath {
    /// Parses a path string.
    ///
    /// `file://` URIs become local paths; any other `scheme://` prefix makes a
    /// cloud path. Everything else is a local path.
    pub fn new(path: &str) -> Self {
        if let Some((scheme, rest)) = path.split_once(SCHEME_SEP) {
            if scheme.eq_ignore_ascii_case("file") {
                if let Some(local) = Url::parse(path).ok().and_then(|url| url.to_file_path().ok())
                {
                    return Self::Local(normalize_local(&local));
                }
            } else if is_scheme(scheme) {
                let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
                return Self::Cloud {
                    scheme: scheme.to_string(),
                    bucket: bucket.to_string(),
                    key: normalize_key(key),
                };
            }
        }
        Self::Local(normalize_local(Path::new(path)))
    }

    /// Builds a path from a template value.
    ///
    /// Values produced by `as_path` are reused as they are; anything else is
    /// parsed from its rendered string form.
    pub fn from_value(value: &Value) -> Self {
        match value.downcast_object_ref::<PanPath>() {
            Some(path) => path.clone(),
            None => Self::new(&value.to_string()),
        }
    }

    pub fn is_cloud(&self) -> bool {
        matches!(self, Self::Cloud { .. })
    }

    /// The local path, or an error naming `operation` for cloud paths.
    pub fn local(&self, operation: &'static str) -> Result<&Path> {
        match self {
            Self::Local(path) => Ok(path),
            Self::Cloud { .. } => {
                Err(Error::CloudPathError { operation, path: self.to_string() })
            }
        }
    }

    /// The final component, empty for roots.
    pub fn name(&self) -> String {
        match self {
            Self::Local(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Self::Cloud { key, .. } => key.rsplit('/').next().unwrap_or_default().to_string(),
        }
    }

    /// The final component without its last extension.
    pub fn stem(&self) -> String {
        let name = self.name();
        splitext(&name).0.to_string()
    }

    /// The last extension of the final component, with its leading dot.
    pub fn suffix(&self) -> String {
        let name = self.name();
        splitext(&name).1.to_string()
    }

    /// The logical parent. Roots and the empty relative path are their own parent.
    pub fn parent(&self) -> Self {
        match self {
            Self::Local(path) => match path.parent() {
                Some(parent) => Self::Local(parent.to_path_buf()),
                None => self.clone(),
            },
            Self::Cloud { scheme, bucket, key } => Self::Cloud {
                scheme: scheme.clone(),
                bucket: bucket.clone(),
                key: key.rsplit_once('/').map(|(head, _)| head.to_string()).unwrap_or_default(),
            },
        }
    }

    /// Appends `segment`.
    ///
    /// For local paths an absolute segment replaces the path. For cloud paths
    /// the segment is appended to the key, and a segment that is itself a
    /// URI replaces the path.
    pub fn join(&self, segment: &str) -> Self {
        match self {
            Self::Local(path) => match Self::new(segment) {
                Self::Local(segment) => Self::Local(path.join(segment)),
                cloud => cloud,
            },
            Self::Cloud { scheme, bucket, key } => {
                if segment.contains(SCHEME_SEP) {
                    return Self::new(segment);
                }
                let key = if segment.starts_with('/') {
                    normalize_key(segment)
                } else {
                    normalize_key(&format!("{key}/{segment}"))
                };
                Self::Cloud { scheme: scheme.clone(), bucket: bucket.clone(), key }
            }
        }
    }

    pub fn exists(&self) -> bool {
        self.local("stat").map(Path::exists).unwrap_or(false)
    }

    pub fn is_dir(&self) -> bool {
        self.local("stat").map(Path::is_dir).unwrap_or(false)
    }

    pub fn is_file(&self) -> bool {
        self.local("stat").map(Path::is_file).unwrap_or(false)
    }

    pub fn is_symlink(&self) -> bool {
        self.local("stat").map(Path::is_symlink).unwrap_or(false)
    }

    /// Metadata of the path, following symlinks.
    pub fn metadata(&self) -> Result<Metadata> {
        Ok(fs::metadata(self.local("stat")?)?)
    }

    /// Reads the whole file.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(fs::read(self.local("read")?)?)
    }

    /// The target of a symbolic link.
    pub fn read_link(&self) -> Result<Self> {
        let path = self.local("readlink")?;
        if !path.is_symlink() {
            return Err(Error::NotASymlinkError { path: self.to_string() });
        }
        Ok(Self::Local(fs::read_link(path)?))
    }

    /// The absolute path with symlinks resolved.
    ///
    /// Paths that cannot be canonicalized (e.g. because they do not exist)
    /// are made absolute against the current directory and have `..`
    /// resolved lexically. Cloud paths are returned unchanged.
    pub fn resolve(&self) -> Result<Self> {
        let path = match self {
            Self::Local(path) => path,
            Self::Cloud { .. } => return Ok(self.clone()),
        };
        match fs::canonicalize(path) {
            Ok(resolved) => Ok(Self::Local(resolved)),
            Err(err) => {
                debug!("Cannot canonicalize '{}' ({err}), resolving lexically", path.display());
                let absolute = std::env::current_dir()?.join(path);
                let mut resolved = PathBuf::new();
                for component in absolute.components() {
                    match component {
                        Component::ParentDir => {
                            resolved.pop();
                        }
                        Component::CurDir => {}
                        other => resolved.push(other),
                    }
                }
                Ok(Self::Local(resolved))
            }
        }
    }
}

impl fmt::Display for PanPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) if path.as_os_str().is_empty() => write!(f, "."),
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Cloud { scheme, bucket, key } => write!(f, "{scheme}{SCHEME_SEP}{bucket}/{key}"),
        }
    }
}

impl From<&str> for PanPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl Object for PanPath {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "name" => Some(Value::from(self.name())),
            "stem" => Some(Value::from(self.stem())),
            "suffix" => Some(Value::from(self.suffix())),
            "parent" => Some(Value::from_object(self.parent())),
            "is_cloud" => Some(Value::from(self.is_cloud())),
            "scheme" => Some(match &**self {
                Self::Cloud { scheme, .. } => Value::from(scheme.clone()),
                Self::Local(_) => Value::from("file"),
            }),
            _ => None,
        }
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn normalize_local(path: &Path) -> PathBuf {
    path.components().filter(|component| *component != Component::CurDir).collect()
}

fn normalize_key(key: &str) -> String {
    key.split('/').filter(|part| !part.is_empty() && *part != ".").collect::<Vec<_>>().join("/")
}
