//! Persisted configuration
//!
//! The only state hearth keeps is the central registry: which hearths are
//! tracked, where their sources live, and which devices have been seen. It
//! lives at `~/.hearth-central.toml` unless another path is given.
//!
//! # Example
//!
//! ```ignore
//! use hearth_core::config::Central;
//!
//! let path = Central::default_path().expect("home directory");
//! let central = Central::load(&path)?;
//! let locations = central.hearth("music")?.locations()?;
//! ```

mod central;

pub use central::{Central, Device, HearthInfo};
