//! Running the pipeline against real locations
//!
//! - **engine**: Concurrent, cancellable scans feeding diff and reconcile
//! - **executor**: Applies a plan to the location roots

mod engine;
mod executor;

pub use engine::SyncEngine;
pub use executor::{ExecuteOptions, ExecutionReport, PlanExecutor};
