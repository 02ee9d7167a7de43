//! [`TestLocation`] builder for synchronization test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary storage location with a named root directory.
///
/// The root lives one level below the temp dir so several locations can share
/// the same root name, which the diff requires.
///
/// # Example
///
/// ```rust,no_run
/// use hearth_test_utils::TestLocation;
///
/// let master = TestLocation::named("photos")
///     .with_file("2020/beach.jpg")
///     .with_dir("2021");
/// master.assert_exists("2020/beach.jpg");
/// ```
pub struct TestLocation {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestLocation {
    fn default() -> Self {
        Self::named("location")
    }
}

impl TestLocation {
    /// Create an empty location whose root directory is called `name`.
    pub fn named(name: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(name);
        fs::create_dir(&root).unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Return the root path of the location.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a `/`-separated relative path under the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |acc, s| acc.join(s))
    }

    /// Write a file (creating parent directories) with its path as content.
    pub fn with_file(self, relative: &str) -> Self {
        self.write(relative, relative);
        self
    }

    /// Create a directory and any missing parents.
    pub fn with_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.path(relative)).unwrap();
        self
    }

    /// Write `content` to a file under the root.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Create a symlink at `relative` pointing at `target` (taken verbatim).
    #[cfg(unix)]
    pub fn with_symlink(self, relative: &str, target: impl AsRef<Path>) -> Self {
        let link = self.path(relative);
        if let Some(parent) = link.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        std::os::unix::fs::symlink(target, link).unwrap();
        self
    }

    /// Read a file under the root.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Assert that `relative` exists under the root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.exists(), "Expected path to exist: {}", path.display());
    }

    /// Assert that `relative` does **not** exist under the root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_missing(&self, relative: &str) {
        let path = self.path(relative);
        assert!(
            !path.exists(),
            "Expected path NOT to exist: {}",
            path.display()
        );
    }
}
