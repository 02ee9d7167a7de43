//! Diffing and reconciliation engine for hearth
//!
//! This crate turns directory trees built by `hearth-fs` into plans:
//!
//! - **Diffing**: Root-relative set comparison of two trees, and the star of
//!   diffs around a hub location
//! - **Reconciliation**: Four strategies mapping diffs to ordered copy and
//!   delete operations
//! - **SyncEngine**: Concurrent, cancellable scans of N locations feeding the
//!   pipeline, and a `PlanExecutor` that applies the result
//! - **Central registry**: Tracked hearths, their sources, and known devices
//!
//! # Architecture
//!
//! ```text
//!                      hearth-cli
//!                          |
//!                     hearth-core
//!          +-------+-------+--------+--------+
//!          |       |       |        |        |
//!        sync -> diff -> reconcile  config  ordering
//!          |
//!       hearth-fs (path, tree, walk, io, config)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use hearth_core::{LocationId, StrategyKind, SyncEngine, SyncStrategy};
//! use tokio_util::sync::CancellationToken;
//!
//! let engine = SyncEngine::new(["/home/me/music", "/mnt/usb/music"]).named("music");
//! let strategy = SyncStrategy::with_master(StrategyKind::TrueMasterCopy, LocationId(0));
//! let plan = engine.plan(&strategy, &CancellationToken::new()).await?;
//! print!("{plan}");
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod location;
pub mod ordering;
pub mod reconcile;
pub mod sync;

pub use config::{Central, Device, HearthInfo};
pub use diff::{DiffResult, StarDiff, diff};
pub use error::{Error, Result};
pub use location::{LocationId, location_ids};
pub use ordering::into_sorted;
pub use reconcile::{
    Conflict, Operation, OperationKind, Plan, StrategyKind, SyncStrategy, reconcile,
};
pub use sync::{ExecuteOptions, ExecutionReport, PlanExecutor, SyncEngine};
