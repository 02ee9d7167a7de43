//! Structured paths for cross-location comparison
//!
//! A path is kept as a sequence of segments, each tagged as a directory or a
//! file, and compared structurally rather than as a string. Paths are
//! normalized to forward slashes the same way on every platform and converted
//! to native form only at I/O boundaries.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One component of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathSegment {
    name: String,
    is_dir: bool,
}

impl PathSegment {
    /// Create a segment. The name must not be empty or contain a separator.
    pub fn new(name: impl Into<String>, is_dir: bool) -> Result<Self> {
        let name = name.into();
        validate_segment_name(&name)?;
        Ok(Self { name, is_dir })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// Check that `name` can be used as a single path segment.
pub fn validate_segment_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_path(name, "segment is empty"));
    }
    if name == "." || name == ".." {
        return Err(Error::invalid_path(name, "segment is a relative marker"));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(Error::invalid_path(
            name,
            "segment contains a separator or NUL byte",
        ));
    }
    Ok(())
}

/// A root-relative path as an ordered sequence of [`PathSegment`]s.
///
/// Only the final segment may be a file. Ordering is segment by segment
/// (name first, then kind), so a directory always sorts before everything
/// inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SegmentPath {
    segments: Vec<PathSegment>,
}

/// Parse a raw path into segments.
///
/// Both `/` and `\` separate segments. Empty and `.` segments are dropped and
/// `..` removes the preceding segment. Every segment but the last is a
/// directory; the last one takes `is_dir_hint`.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] for empty input, input containing a NUL
/// byte, input that normalizes to nothing, or a `..` escaping the first
/// segment.
pub fn parse_path(raw: &str, is_dir_hint: bool) -> Result<SegmentPath> {
    if raw.is_empty() {
        return Err(Error::invalid_path(raw, "path is empty"));
    }
    if raw.contains('\0') {
        return Err(Error::invalid_path(raw, "path contains a NUL byte"));
    }

    let mut names: Vec<&str> = Vec::new();
    for part in raw.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                if names.pop().is_none() {
                    return Err(Error::invalid_path(raw, "'..' escapes above the root"));
                }
            }
            name => names.push(name),
        }
    }

    if names.is_empty() {
        return Err(Error::invalid_path(raw, "path has no segments"));
    }

    let last = names.len() - 1;
    let segments = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| PathSegment {
            name: name.to_string(),
            is_dir: i < last || is_dir_hint,
        })
        .collect();

    Ok(SegmentPath { segments })
}

impl SegmentPath {
    /// Build a path from already split segments.
    ///
    /// # Errors
    ///
    /// Fails if `segments` is empty or a non-final segment is a file.
    pub fn new(segments: Vec<PathSegment>) -> Result<Self> {
        let Some((_, init)) = segments.split_last() else {
            return Err(Error::invalid_path("", "path has no segments"));
        };
        if let Some(file) = init.iter().find(|s| !s.is_dir) {
            return Err(Error::invalid_path(
                file.name.clone(),
                "only the final segment may be a file",
            ));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Segment names from the root down.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.name.as_str())
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether the final segment is a directory.
    pub fn is_dir(&self) -> bool {
        self.last().is_dir
    }

    /// Name of the final segment.
    pub fn file_name(&self) -> &str {
        &self.last().name
    }

    /// The enclosing directory, or `None` for a top-level entry.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append a child entry to this directory path.
    ///
    /// # Errors
    ///
    /// Fails if this path is a file or `name` is not a valid segment.
    pub fn join(&self, name: &str, is_dir: bool) -> Result<Self> {
        if !self.is_dir() {
            return Err(Error::invalid_path(
                format!("{self}{name}"),
                "cannot join onto a file",
            ));
        }
        let mut segments = self.segments.clone();
        segments.push(PathSegment::new(name, is_dir)?);
        Ok(Self { segments })
    }

    /// Whether `prefix` equals this path or is one of its ancestor directories.
    pub fn starts_with(&self, prefix: &SegmentPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Whether the names of `other` are a prefix of this path's names,
    /// ignoring the kinds.
    pub fn names_start_with(&self, other: &SegmentPath) -> bool {
        other.depth() <= self.depth() && other.names().zip(self.names()).all(|(a, b)| a == b)
    }

    /// The first `depth` segments of this path, with the last of them given
    /// the kind `is_dir`. `None` when `depth` is zero or exceeds the path.
    pub fn truncated(&self, depth: usize, is_dir: bool) -> Option<Self> {
        if depth == 0 || depth > self.segments.len() {
            return None;
        }
        let mut segments = self.segments[..depth].to_vec();
        segments[depth - 1].is_dir = is_dir;
        Some(Self { segments })
    }

    /// Resolve this path under a native root directory.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in &self.segments {
            path.push(&segment.name);
        }
        path
    }

    /// Top-level entry from a name read off disk. Names on disk are taken as
    /// they are, even when they contain characters `parse_path` splits on.
    pub(crate) fn from_disk_name(name: &str, is_dir: bool) -> Self {
        Self {
            segments: vec![PathSegment {
                name: name.to_string(),
                is_dir,
            }],
        }
    }

    /// Child entry from a name read off disk. `self` must be a directory.
    pub(crate) fn child_from_disk_name(&self, name: &str, is_dir: bool) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment {
            name: name.to_string(),
            is_dir,
        });
        Self { segments }
    }

    fn last(&self) -> &PathSegment {
        // Construction guarantees at least one segment.
        &self.segments[self.segments.len() - 1]
    }
}

impl fmt::Display for SegmentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(&segment.name)?;
        }
        if self.is_dir() {
            f.write_str("/")?;
        }
        Ok(())
    }
}

impl FromStr for SegmentPath {
    type Err = Error;

    /// Parse the display form back; a trailing separator marks a directory.
    fn from_str(s: &str) -> Result<Self> {
        parse_path(s, s.ends_with(['/', '\\']))
    }
}

impl From<SegmentPath> for String {
    fn from(path: SegmentPath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for SegmentPath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_marks_only_last_segment_with_hint() {
        let path = parse_path("a/b/c.txt", false).unwrap();
        let kinds: Vec<bool> = path.segments().iter().map(PathSegment::is_dir).collect();
        assert_eq!(kinds, vec![true, true, false]);
    }

    #[test]
    fn display_marks_directories() {
        assert_eq!(parse_path("a/b", true).unwrap().to_string(), "a/b/");
        assert_eq!(parse_path("a/b", false).unwrap().to_string(), "a/b");
    }

    #[test]
    fn from_str_reads_trailing_separator_as_directory() {
        let path: SegmentPath = "photos/2020/".parse().unwrap();
        assert!(path.is_dir());
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn join_onto_file_fails() {
        let file = parse_path("a.txt", false).unwrap();
        assert!(file.join("b", false).is_err());
    }

    #[test]
    fn parent_of_top_level_is_none() {
        assert!(parse_path("a", true).unwrap().parent().is_none());
        let nested = parse_path("a/b", false).unwrap();
        assert_eq!(nested.parent().unwrap(), parse_path("a", true).unwrap());
    }

    #[test]
    fn directory_sorts_before_its_contents() {
        let dir = parse_path("a", true).unwrap();
        let child = parse_path("a/z.txt", false).unwrap();
        let sibling = parse_path("b.txt", false).unwrap();
        assert!(dir < child);
        assert!(child < sibling);
    }

    #[test]
    fn serde_uses_display_form() {
        let path = parse_path("music/album", true).unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"music/album/\"");
        let back: SegmentPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
