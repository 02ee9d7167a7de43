//! Error types for hearth-fs

use std::path::PathBuf;

/// Result type for hearth-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hearth-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid path {input:?}: {reason}")]
    InvalidPath { input: String, reason: String },

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("Name collision in {parent:?}: {name:?} is both a file and a directory")]
    NameCollision { parent: String, name: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} config for {path}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

/// Failures while building a tree from a location on disk.
///
/// Any of these fails the whole build for that root.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Symlink cycle at {path} (loops back to {ancestor})")]
    SymlinkCycle { path: PathBuf, ancestor: PathBuf },

    #[error("Name is not valid UTF-8: {path}")]
    NonUtf8Name { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Walk of {root} was cancelled")]
    Cancelled { root: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_path(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came out of a cancelled walk.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Walk(WalkError::Cancelled { .. }))
    }
}
