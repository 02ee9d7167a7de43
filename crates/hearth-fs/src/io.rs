//! Filesystem mutations used when applying a sync plan
//!
//! Writes go through a temporary file in the destination directory followed
//! by a rename, so an interrupted copy never leaves a truncated file behind.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

fn temp_sibling(path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.hearth-tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    path.with_file_name(temp_name)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// Write content atomically to a file with locking.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent(path)?;
    let temp_path = temp_sibling(path);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))
}

/// Copy a single file's bytes to `dest`, replacing any file already there.
///
/// Returns the number of bytes copied.
pub fn copy_file_atomic(source: &Path, dest: &Path) -> Result<u64> {
    ensure_parent(dest)?;
    let temp_path = temp_sibling(dest);

    let copied = match fs::copy(source, &temp_path) {
        Ok(copied) => copied,
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::io(source, e));
        }
    };
    if let Err(e) = fs::rename(&temp_path, dest) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(dest, e));
    }
    Ok(copied)
}

/// Create a directory and any missing parents.
pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Remove a file, or an empty directory.
///
/// Directories are never removed recursively; their contents must already be
/// gone.
pub fn remove_entry(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| Error::io(path, e))?;
    let result = if metadata.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_atomic_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/file.toml");
        write_atomic(&path, b"x = 1").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x = 1");
    }

    #[test]
    fn copy_file_atomic_overwrites_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("out/dst.txt");
        fs::write(&src, "new").unwrap();
        fs::create_dir_all(dst.parent().unwrap()).unwrap();
        fs::write(&dst, "old contents").unwrap();

        let copied = copy_file_atomic(&src, &dst).unwrap();
        assert_eq!(copied, 3);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
        assert_eq!(fs::read_dir(dst.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn remove_entry_refuses_non_empty_directory() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("keep.txt"), "k").unwrap();

        assert!(remove_entry(&sub).is_err());
        fs::remove_file(sub.join("keep.txt")).unwrap();
        remove_entry(&sub).unwrap();
        assert!(!sub.exists());
    }
}
