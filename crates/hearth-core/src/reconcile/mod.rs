//! Reconciliation: turning diffs into an ordered list of filesystem changes
//!
//! This module provides:
//! - **strategy**: The four ways locations can converge
//! - **plan**: Operations, skipped copies and the plan that holds them
//! - **engine**: The pure `reconcile` function

mod engine;
mod plan;
mod strategy;

pub use engine::reconcile;
pub use plan::{Conflict, Operation, OperationKind, Plan};
pub use strategy::{StrategyKind, SyncStrategy};
