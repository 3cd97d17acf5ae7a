//! Extension splitting with ignore-lists.
//!
//! A path is split into a kept part and a stripped extension. Extensions named
//! in an ignore-list are skipped over, either once or repeatedly from the end
//! of the path, so that e.g. `sample.txt.gz` can report `.txt` as its
//! extension when `.gz` is ignored.

/// Separator between a file name and its extension.
pub const EXT_SEP: char = '.';

/// Splits `path` at its last extension.
///
/// The extension is searched in the final path segment only and keeps its
/// leading dot. Dots that only lead a name (`.bashrc`, `..`) never start an
/// extension. Without an extension the second part is empty.
///
/// # Examples
/// ```
/// use pipen_filters::splitext::splitext;
///
/// assert_eq!(splitext("/a/b.c.txt"), ("/a/b.c", ".txt"));
/// assert_eq!(splitext("/a.d/b"), ("/a.d/b", ""));
/// assert_eq!(splitext("/a/.bashrc"), ("/a/.bashrc", ""));
/// ```
pub fn splitext(path: &str) -> (&str, &str) {
    let name_start = path.rfind('/').map_or(0, |idx| idx + 1);
    match path.rfind(EXT_SEP) {
        Some(dot) if dot >= name_start && path[name_start..dot].bytes().any(|b| b != b'.') => {
            path.split_at(dot)
        }
        _ => (path, ""),
    }
}

/// Ignore-list and recursion settings for [`SplitOptions::split`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOptions {
    ignore: Vec<String>,
    recursive: bool,
}

impl SplitOptions {
    /// Creates options from extensions written with or without leading dots.
    ///
    /// Every entry is normalized to exactly one leading dot, so `"gz"`,
    /// `".gz"` and `"..gz"` all ignore `.gz`.
    pub fn new<I, S>(ignore: I, recursive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ignore = ignore
            .into_iter()
            .map(|ext| format!("{EXT_SEP}{}", ext.as_ref().trim_start_matches(EXT_SEP)))
            .collect();
        Self { ignore, recursive }
    }

    /// The normalized ignore-list.
    pub fn ignore(&self) -> &[String] {
        &self.ignore
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    fn is_ignored(&self, ext: &str) -> bool {
        self.ignore.iter().any(|ignored| ignored == ext)
    }

    /// Splits `path` into `(kept, stripped)`.
    ///
    /// Non-recursive splitting skips at most one ignored extension; recursive
    /// splitting keeps skipping until an extension outside the ignore-list
    /// (or no extension at all) is found.
    ///
    /// # Examples
    /// ```
    /// use pipen_filters::splitext::SplitOptions;
    ///
    /// let options = SplitOptions::new([".gz", "txt"], true);
    /// assert_eq!(options.split("/a/b.x.txt.gz"), ("/a/b", ".x"));
    /// assert_eq!(options.split("/a/b.txt.gz"), ("/a/b", ""));
    /// ```
    pub fn split<'a>(&self, path: &'a str) -> (&'a str, &'a str) {
        let (mut kept, mut stripped) = splitext(path);
        if !self.recursive {
            return if self.is_ignored(stripped) { splitext(kept) } else { (kept, stripped) };
        }

        while self.is_ignored(stripped) {
            (kept, stripped) = splitext(kept);
        }
        (kept, stripped)
    }
}

/// Splits `path` with an ignore-list in one call.
pub fn split_ext<'a, I, S>(path: &'a str, ignore: I, recursive: bool) -> (&'a str, &'a str)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SplitOptions::new(ignore, recursive).split(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splitext_basic() {
        assert_eq!(splitext("/a/b.txt"), ("/a/b", ".txt"));
        assert_eq!(splitext("b.txt"), ("b", ".txt"));
        assert_eq!(splitext("/a/b"), ("/a/b", ""));
        assert_eq!(splitext(""), ("", ""));
    }

    #[test]
    fn test_splitext_dot_in_directory() {
        assert_eq!(splitext("/a.d/b"), ("/a.d/b", ""));
        assert_eq!(splitext("a.d/b.e"), ("a.d/b", ".e"));
    }

    #[test]
    fn test_splitext_leading_dots() {
        assert_eq!(splitext(".bashrc"), (".bashrc", ""));
        assert_eq!(splitext("/x/..."), ("/x/...", ""));
        assert_eq!(splitext("/x/..a.b"), ("/x/..a", ".b"));
        assert_eq!(splitext("a."), ("a", "."));
    }

    #[test]
    fn test_splitext_cloud_uri() {
        assert_eq!(splitext("s3://bucket/dir/file.txt"), ("s3://bucket/dir/file", ".txt"));
    }

    #[test]
    fn test_normalize_ignore() {
        let options = SplitOptions::new(["gz", ".txt", "..bam"], false);
        assert_eq!(options.ignore(), [".gz", ".txt", ".bam"]);
    }

    #[test]
    fn test_split_non_recursive_skips_once() {
        let options = SplitOptions::new(["gz", "txt"], false);
        assert_eq!(options.split("/a/b.x.txt.gz"), ("/a/b.x", ".txt"));
        assert_eq!(options.split("/a/b.x.bed"), ("/a/b.x", ".bed"));
    }

    #[test]
    fn test_split_recursive() {
        let options = SplitOptions::new([".gz", "txt"], true);
        assert_eq!(options.split("/a/b.txt.gz"), ("/a/b", ""));
        assert_eq!(options.split("/a/b.x.txt.gz"), ("/a/b", ".x"));
    }

    #[test]
    fn test_split_matching_is_exact() {
        let options = SplitOptions::new(["GZ"], true);
        assert_eq!(options.split("a.txt.gz"), ("a.txt", ".gz"));
    }

    #[test]
    fn test_split_ext_shorthand() {
        assert_eq!(split_ext("a.b.c", Vec::<String>::new(), false), ("a.b", ".c"));
        assert_eq!(split_ext("a.b.c", ["c"], false), ("a", ".b"));
    }
}
