//! In-memory model of a directory hierarchy

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::path::{SegmentPath, validate_segment_name};
use crate::{Error, Result};

/// One directory and everything below it.
///
/// Subdirectories are owned by their parent. A name is either a file or a
/// subdirectory within one tree, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryTree {
    name: String,
    files: HashSet<String>,
    subdirectories: HashMap<String, DirectoryTree>,
}

impl DirectoryTree {
    /// Create an empty tree. The root name identifies the logical location
    /// and is not itself part of any flattened path.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: HashSet::new(),
            subdirectories: HashMap::new(),
        }
    }

    /// Build a tree from root-relative paths, creating intermediate
    /// directories as needed.
    pub fn from_paths<'a>(
        name: impl Into<String>,
        paths: impl IntoIterator<Item = &'a SegmentPath>,
    ) -> Result<Self> {
        let mut tree = Self::new(name);
        for path in paths {
            tree.insert_path(path)?;
        }
        Ok(tree)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Files directly in this directory, in no particular order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    /// Immediate subdirectories, in no particular order.
    pub fn subdirectories(&self) -> impl Iterator<Item = &DirectoryTree> {
        self.subdirectories.values()
    }

    pub fn subdirectory(&self, name: &str) -> Option<&DirectoryTree> {
        self.subdirectories.get(name)
    }

    pub fn contains_file(&self, name: &str) -> bool {
        self.files.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.subdirectories.is_empty()
    }

    /// Add a file directly under this directory.
    ///
    /// Returns `false` if the file was already present.
    ///
    /// # Errors
    ///
    /// Fails on an invalid name or when a subdirectory already uses it.
    pub fn insert_file(&mut self, name: impl Into<String>) -> Result<bool> {
        let name = name.into();
        validate_segment_name(&name)?;
        self.add_file(name)
    }

    /// Attach a subtree. An existing subdirectory of the same name is merged
    /// with it.
    ///
    /// # Errors
    ///
    /// Fails on an invalid name or any file/directory name collision, at this
    /// level or inside the merge.
    pub fn insert_subdirectory(&mut self, tree: DirectoryTree) -> Result<()> {
        validate_segment_name(&tree.name)?;
        self.attach(tree)
    }

    /// Add a root-relative path, creating every missing directory on the way.
    pub fn insert_path(&mut self, path: &SegmentPath) -> Result<()> {
        let mut current = self;
        for segment in path.segments() {
            if segment.is_dir() {
                current = current.add_dir(segment.name())?;
            } else {
                current.add_file(segment.name().to_string())?;
            }
        }
        Ok(())
    }

    /// Every file and directory below the root as a root-relative path.
    ///
    /// Directory paths keep their directory marker, so a file `x` and an
    /// empty directory `x/` stay distinct.
    pub fn flatten(&self) -> HashSet<SegmentPath> {
        let mut paths = HashSet::with_capacity(self.entry_count());
        let mut stack: Vec<(Option<SegmentPath>, &DirectoryTree)> = vec![(None, self)];

        while let Some((prefix, tree)) = stack.pop() {
            let entry = |name: &str, is_dir: bool| match &prefix {
                Some(parent) => parent.child_from_disk_name(name, is_dir),
                None => SegmentPath::from_disk_name(name, is_dir),
            };

            for file in &tree.files {
                paths.insert(entry(file.as_str(), false));
            }
            for (name, subdirectory) in &tree.subdirectories {
                let path = entry(name.as_str(), true);
                paths.insert(path.clone());
                stack.push((Some(path), subdirectory));
            }
        }

        paths
    }

    /// Number of files anywhere below the root.
    pub fn file_count(&self) -> usize {
        self.files.len()
            + self
                .subdirectories
                .values()
                .map(DirectoryTree::file_count)
                .sum::<usize>()
    }

    /// Number of directories below the root, not counting the root.
    pub fn dir_count(&self) -> usize {
        self.subdirectories.len()
            + self
                .subdirectories
                .values()
                .map(DirectoryTree::dir_count)
                .sum::<usize>()
    }

    pub fn entry_count(&self) -> usize {
        self.file_count() + self.dir_count()
    }

    pub(crate) fn add_file(&mut self, name: String) -> Result<bool> {
        if self.subdirectories.contains_key(&name) {
            return Err(self.collision(name));
        }
        Ok(self.files.insert(name))
    }

    pub(crate) fn add_dir(&mut self, name: &str) -> Result<&mut DirectoryTree> {
        if self.files.contains(name) {
            return Err(self.collision(name.to_string()));
        }
        Ok(self
            .subdirectories
            .entry(name.to_string())
            .or_insert_with(|| DirectoryTree::new(name)))
    }

    fn attach(&mut self, tree: DirectoryTree) -> Result<()> {
        if self.files.contains(&tree.name) {
            return Err(self.collision(tree.name));
        }
        match self.subdirectories.entry(tree.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(tree);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                for file in tree.files {
                    existing.add_file(file)?;
                }
                for (_, subdirectory) in tree.subdirectories {
                    existing.attach(subdirectory)?;
                }
            }
        }
        Ok(())
    }

    fn collision(&self, name: String) -> Error {
        Error::NameCollision {
            parent: self.name.clone(),
            name,
        }
    }
}
