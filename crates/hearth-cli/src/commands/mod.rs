//! Command implementations for hearth-cli

pub mod compare;
pub mod init;
pub mod list;
pub mod sync;
pub mod track;

use std::path::{Path, PathBuf};

use hearth_core::Central;

use crate::error::{CliError, Result};

pub use compare::run_compare;
pub use init::run_init;
pub use list::run_list;
pub use sync::run_sync;
pub use track::run_track;

/// The central registry path: the `--central` flag if given, the default
/// location otherwise.
pub fn central_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    flag.or_else(Central::default_path).ok_or_else(|| {
        CliError::user("Could not locate a home directory; pass --central <PATH>")
    })
}

/// The logical root name for raw location arguments: `name` when given,
/// otherwise the final component of `first`.
pub fn logical_name(name: Option<String>, first: &Path) -> Result<String> {
    if let Some(name) = name {
        return Ok(name);
    }
    final_component(first).ok_or_else(|| {
        CliError::user(format!(
            "Cannot derive a name from '{}'; pass --name",
            first.display()
        ))
    })
}

/// Canonicalized first so that `.` and `..` resolve to a real name.
fn final_component(path: &Path) -> Option<String> {
    let canonical = std::fs::canonicalize(path).ok();
    canonical
        .as_deref()
        .unwrap_or(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}
