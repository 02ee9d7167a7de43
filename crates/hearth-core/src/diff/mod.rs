//! Tree diffing
//!
//! Both trees are flattened into root-relative path sets and compared with
//! plain set algebra. A moved or renamed directory therefore shows up as a
//! full removal plus a full addition, never as a move.

mod star;

use std::collections::HashSet;

use hearth_fs::{DirectoryTree, SegmentPath};
use tracing::debug;

use crate::ordering::into_sorted;
use crate::{Error, Result};

pub use star::StarDiff;

/// Partition of the paths of two trees.
///
/// Every path of either tree lands in exactly one of the three sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    only_in_a: HashSet<SegmentPath>,
    only_in_b: HashSet<SegmentPath>,
    in_both: HashSet<SegmentPath>,
}

/// Compare two trees describing the same logical location.
///
/// # Errors
///
/// Returns [`Error::IncompatibleRoots`] when the trees' root names differ.
pub fn diff(a: &DirectoryTree, b: &DirectoryTree) -> Result<DiffResult> {
    if a.name() != b.name() {
        return Err(Error::IncompatibleRoots {
            left: a.name().to_string(),
            right: b.name().to_string(),
        });
    }

    let paths_a = a.flatten();
    let mut paths_b = b.flatten();

    let mut result = DiffResult::default();
    for path in paths_a {
        if paths_b.remove(&path) {
            result.in_both.insert(path);
        } else {
            result.only_in_a.insert(path);
        }
    }
    result.only_in_b = paths_b;

    debug!(
        root = a.name(),
        only_in_a = result.only_in_a.len(),
        only_in_b = result.only_in_b.len(),
        in_both = result.in_both.len(),
        "Diffed trees"
    );
    Ok(result)
}

impl DiffResult {
    pub fn only_in_a(&self) -> &HashSet<SegmentPath> {
        &self.only_in_a
    }

    pub fn only_in_b(&self) -> &HashSet<SegmentPath> {
        &self.only_in_b
    }

    pub fn in_both(&self) -> &HashSet<SegmentPath> {
        &self.in_both
    }

    pub fn sorted_only_in_a(&self) -> Vec<&SegmentPath> {
        into_sorted(&self.only_in_a)
    }

    pub fn sorted_only_in_b(&self) -> Vec<&SegmentPath> {
        into_sorted(&self.only_in_b)
    }

    pub fn sorted_in_both(&self) -> Vec<&SegmentPath> {
        into_sorted(&self.in_both)
    }

    /// True when neither side has anything the other lacks.
    pub fn is_identical(&self) -> bool {
        self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }

    /// Whether tree A holds `path`.
    pub fn in_a(&self, path: &SegmentPath) -> bool {
        self.only_in_a.contains(path) || self.in_both.contains(path)
    }

    /// Whether tree B holds `path`.
    pub fn in_b(&self, path: &SegmentPath) -> bool {
        self.only_in_b.contains(path) || self.in_both.contains(path)
    }

    /// The same diff seen from B's side.
    pub fn swapped(&self) -> Self {
        Self {
            only_in_a: self.only_in_b.clone(),
            only_in_b: self.only_in_a.clone(),
            in_both: self.in_both.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(name: &str, raw: &[&str]) -> DirectoryTree {
        let paths: Vec<SegmentPath> = raw.iter().map(|p| p.parse().unwrap()).collect();
        DirectoryTree::from_paths(name, &paths).unwrap()
    }

    fn display(paths: Vec<&SegmentPath>) -> Vec<String> {
        paths.into_iter().map(ToString::to_string).collect()
    }

    #[test]
    fn splits_paths_into_three_sets() {
        let a = tree("r", &["shared.txt", "a_only.txt", "dir/inner.txt"]);
        let b = tree("r", &["shared.txt", "b_only.txt", "dir/"]);

        let result = diff(&a, &b).unwrap();

        assert_eq!(
            display(result.sorted_only_in_a()),
            vec!["a_only.txt", "dir/inner.txt"]
        );
        assert_eq!(display(result.sorted_only_in_b()), vec!["b_only.txt"]);
        assert_eq!(display(result.sorted_in_both()), vec!["dir/", "shared.txt"]);
    }

    #[test]
    fn mismatched_roots_are_rejected() {
        let err = diff(&tree("music", &[]), &tree("photos", &[])).unwrap_err();
        assert!(matches!(err, Error::IncompatibleRoots { .. }));
    }

    #[test]
    fn file_and_directory_of_same_name_differ() {
        let a = tree("r", &["x"]);
        let b = tree("r", &["x/"]);

        let result = diff(&a, &b).unwrap();
        assert!(result.in_both().is_empty());
        assert_eq!(result.only_in_a().len(), 1);
        assert_eq!(result.only_in_b().len(), 1);
    }

    #[test]
    fn moved_directory_is_remove_plus_add() {
        let a = tree("r", &["old/song.mp3"]);
        let b = tree("r", &["new/song.mp3"]);

        let result = diff(&a, &b).unwrap();
        assert_eq!(display(result.sorted_only_in_a()), vec!["old/", "old/song.mp3"]);
        assert_eq!(display(result.sorted_only_in_b()), vec!["new/", "new/song.mp3"]);
    }
}
