//! Plans: the ordered filesystem operations a reconciliation produces

use std::fmt;

use hearth_fs::SegmentPath;
use serde::{Deserialize, Serialize};

use super::strategy::SyncStrategy;
use crate::location::LocationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Copy,
    Delete,
}

/// One filesystem change. `source` is set for copies only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OperationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LocationId>,
    pub target: LocationId,
    pub path: SegmentPath,
}

impl Operation {
    pub fn copy(source: LocationId, target: LocationId, path: SegmentPath) -> Self {
        Self {
            kind: OperationKind::Copy,
            source: Some(source),
            target,
            path,
        }
    }

    pub fn delete(target: LocationId, path: SegmentPath) -> Self {
        Self {
            kind: OperationKind::Delete,
            source: None,
            target,
            path,
        }
    }

    pub fn is_copy(&self) -> bool {
        self.kind == OperationKind::Copy
    }

    pub fn is_delete(&self) -> bool {
        self.kind == OperationKind::Delete
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.source) {
            (OperationKind::Copy, Some(source)) => {
                write!(f, "copy {source} -> {} {}", self.target, self.path)
            }
            _ => write!(f, "delete {} {}", self.target, self.path),
        }
    }
}

/// A copy left out of the plan because the target holds an entry of the
/// other kind (file vs directory) at that name or at one of its parents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Conflict {
    pub target: LocationId,
    pub path: SegmentPath,
    pub source: LocationId,
    pub existing: SegmentPath,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot copy {} {} -> {}: {} already holds {}",
            self.path, self.source, self.target, self.target, self.existing
        )
    }
}

/// Ordered operations that bring the locations to the strategy's
/// convergent state.
///
/// Operations are grouped by target location. Within a target every delete
/// comes before every copy; deletes run children-first and copies
/// parents-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    strategy: SyncStrategy,
    operations: Vec<Operation>,
    conflicts: Vec<Conflict>,
}

impl Plan {
    pub(crate) fn new(
        strategy: SyncStrategy,
        operations: Vec<Operation>,
        conflicts: Vec<Conflict>,
    ) -> Self {
        Self {
            strategy,
            operations,
            conflicts,
        }
    }

    pub fn strategy(&self) -> &SyncStrategy {
        &self.strategy
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn copies(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.is_copy())
    }

    pub fn deletes(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.is_delete())
    }

    /// Operations that change `target`, in plan order.
    pub fn for_target(&self, target: LocationId) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(move |op| op.target == target)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.operations {
            writeln!(f, "{op}")?;
        }
        for conflict in &self.conflicts {
            writeln!(f, "skipped: {conflict}")?;
        }
        Ok(())
    }
}
