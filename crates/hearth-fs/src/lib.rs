//! Filesystem model for hearth
//!
//! Structured paths, the in-memory directory tree, the walker that builds it
//! from disk, and the small set of I/O primitives used to apply a sync plan.

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod tree;
pub mod walk;

pub use config::ConfigStore;
pub use error::{Error, Result, WalkError};
pub use path::{PathSegment, SegmentPath, parse_path};
pub use tree::DirectoryTree;
pub use walk::TreeBuilder;
