//! Building a [`DirectoryTree`] from a location on disk

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::WalkError;
use crate::{DirectoryTree, Error, Result};

/// Walks a root directory and models everything below it.
///
/// Symlinks are followed and counted as whatever they point at. A link that
/// loops back to one of its ancestors fails the build with
/// [`WalkError::SymlinkCycle`]. Names that are not valid UTF-8 cannot be
/// keyed losslessly and fail it with [`WalkError::NonUtf8Name`].
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    root: PathBuf,
    name: Option<String>,
    cancel: Option<CancellationToken>,
}

impl TreeBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            name: None,
            cancel: None,
        }
    }

    /// Use `name` as the tree's root name instead of the root's final
    /// path component.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Abort the walk once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the root and return the finished tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Walk`] if the root is missing or not a directory, on
    /// any I/O error below it, on a symlink cycle, or on cancellation. No
    /// partial tree is ever returned.
    pub fn build(&self) -> Result<DirectoryTree> {
        let root = &self.root;
        let metadata = fs::metadata(root).map_err(|source| WalkError::Io {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(WalkError::NotADirectory { path: root.clone() }.into());
        }

        let name = self.name.clone().unwrap_or_else(|| root_name(root));
        let mut tree = DirectoryTree::new(name);

        for entry in WalkDir::new(root).follow_links(true).min_depth(1) {
            self.check_cancelled()?;
            let entry = entry.map_err(|e| walk_error(root, e))?;

            let relative = entry.path().strip_prefix(root).map_err(|_| WalkError::Io {
                path: entry.path().to_path_buf(),
                source: io::Error::other("entry is outside the walk root"),
            })?;
            let mut names = relative
                .components()
                .map(|c| {
                    c.as_os_str()
                        .to_str()
                        .map(str::to_owned)
                        .ok_or_else(|| WalkError::NonUtf8Name {
                            path: entry.path().to_path_buf(),
                        })
                })
                .collect::<std::result::Result<Vec<String>, _>>()?;
            let Some(leaf) = names.pop() else {
                continue;
            };

            let parent = names
                .iter()
                .try_fold(&mut tree, |dir, name| dir.add_dir(name))?;
            if entry.file_type().is_dir() {
                parent.add_dir(&leaf)?;
            } else {
                parent.add_file(leaf)?;
            }
        }

        debug!(
            root = %root.display(),
            files = tree.file_count(),
            dirs = tree.dir_count(),
            "Built directory tree"
        );
        Ok(tree)
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(WalkError::Cancelled {
                root: self.root.clone(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}

/// Final component of the root, resolving `.` and similar through the
/// filesystem when needed.
fn root_name(root: &Path) -> String {
    if let Some(name) = root.file_name() {
        return name.to_string_lossy().into_owned();
    }
    dunce::canonicalize(root)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    if let Some(ancestor) = err.loop_ancestor() {
        return WalkError::SymlinkCycle {
            path,
            ancestor: ancestor.to_path_buf(),
        }
        .into();
    }
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("directory walk failed"));
    WalkError::Io { path, source }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn build_fails_on_missing_root() {
        let dir = tempdir().unwrap();
        let err = TreeBuilder::new(dir.path().join("missing")).build().unwrap_err();
        assert!(matches!(err, Error::Walk(WalkError::Io { .. })));
    }

    #[test]
    fn build_fails_when_root_is_a_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = TreeBuilder::new(&file).build().unwrap_err();
        assert!(matches!(err, Error::Walk(WalkError::NotADirectory { .. })));
    }

    #[test]
    fn named_overrides_root_name() {
        let dir = tempdir().unwrap();
        let tree = TreeBuilder::new(dir.path()).named("photos").build().unwrap();
        assert_eq!(tree.name(), "photos");
    }

    #[test]
    fn pre_cancelled_token_aborts_walk() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let err = TreeBuilder::new(dir.path())
            .with_cancellation(token)
            .build()
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
