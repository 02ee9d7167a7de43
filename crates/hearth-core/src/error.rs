//! Error types for hearth-core

use std::path::PathBuf;

use crate::location::LocationId;

/// Result type for hearth-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hearth-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Trees describe different logical locations
    #[error("Cannot diff tree {left:?} against tree {right:?}: roots differ")]
    IncompatibleRoots { left: String, right: String },

    /// Strategy preconditions not met, or unknown strategy name
    #[error("Invalid strategy: {reason}")]
    InvalidStrategy { reason: String },

    /// Central registry file not found at expected path
    #[error("Central registry not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Hearth missing from the central registry
    #[error("Unknown hearth: {name}")]
    UnknownHearth { name: String },

    /// Hearth's primary source is not one of its sources
    #[error("Hearth {hearth:?} has no source named {name:?}")]
    UnknownSource { hearth: String, name: String },

    /// Fewer locations than the operation needs
    #[error("Need at least {needed} locations, got {found}")]
    NotEnoughLocations { needed: usize, found: usize },

    /// Plan refers to a location the executor has no root for
    #[error("Unknown location {location}: only {count} root(s) given")]
    UnknownLocation { location: LocationId, count: usize },

    /// Operation target sits below a symlink inside its location
    #[error("Refusing to touch {path}: {link} is a symlink")]
    SymlinkedAncestor { path: PathBuf, link: PathBuf },

    /// A background walk task died
    #[error("Scan task failed: {message}")]
    Join { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from hearth-fs
    #[error(transparent)]
    Fs(#[from] hearth_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_strategy(reason: impl Into<String>) -> Self {
        Self::InvalidStrategy {
            reason: reason.into(),
        }
    }

    /// Whether this error is a cancelled scan rather than a real failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Fs(e) if e.is_cancelled())
    }
}
