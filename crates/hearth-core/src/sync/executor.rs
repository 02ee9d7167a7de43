//! Applying a plan to the filesystem

use std::path::{Path, PathBuf};

use hearth_fs::io;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::location::LocationId;
use crate::reconcile::{Operation, OperationKind, Plan};
use crate::{Error, Result};

/// Report from executing a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Whether every operation succeeded
    pub success: bool,
    /// Actions taken, in plan order
    pub actions: Vec<String>,
    /// One message per failed operation
    pub errors: Vec<String>,
}

/// Options for plan execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// If true, simulate changes without modifying the filesystem.
    /// Actions will be prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}

/// Applies plans against a fixed list of location roots.
///
/// `roots[i]` is the root of [`LocationId(i)`](LocationId).
///
/// Scans follow symlinks, so a plan may name paths that live behind a link.
/// Operations are only ever applied to the link itself: anything below a
/// symlinked directory of the target location fails with
/// [`Error::SymlinkedAncestor`].
#[derive(Debug, Clone)]
pub struct PlanExecutor {
    roots: Vec<PathBuf>,
}

impl PlanExecutor {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Run every operation of `plan` in order.
    ///
    /// A failing operation is recorded in the report and execution moves on
    /// to the next one.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownLocation`] if the plan mentions a location with no
    /// root. This is checked before anything is touched.
    pub fn execute(&self, plan: &Plan, options: &ExecuteOptions) -> Result<ExecutionReport> {
        for op in plan.operations() {
            self.root(op.target)?;
            if let Some(source) = op.source {
                self.root(source)?;
            }
        }

        let mut report = ExecutionReport {
            success: true,
            ..Default::default()
        };

        for op in plan.operations() {
            if options.dry_run {
                report.actions.push(format!("[dry-run] Would {}", self.describe(op)?));
                continue;
            }
            match self.apply(op) {
                Ok(action) => {
                    info!("{action}");
                    report.actions.push(action);
                }
                Err(e) => {
                    warn!(operation = %op, error = %e, "Operation failed");
                    report.success = false;
                    report.errors.push(format!("{op}: {e}"));
                }
            }
        }

        Ok(report)
    }

    fn root(&self, location: LocationId) -> Result<&Path> {
        self.roots
            .get(location.index())
            .map(PathBuf::as_path)
            .ok_or(Error::UnknownLocation {
                location,
                count: self.roots.len(),
            })
    }

    fn describe(&self, op: &Operation) -> Result<String> {
        let target = op.path.to_native(self.root(op.target)?);
        Ok(match (op.kind, op.source) {
            (OperationKind::Copy, Some(source)) => {
                let from = op.path.to_native(self.root(source)?);
                format!("copy {} to {}", from.display(), target.display())
            }
            _ => format!("delete {}", target.display()),
        })
    }

    fn apply(&self, op: &Operation) -> Result<String> {
        let root = self.root(op.target)?;
        let target = op.path.to_native(root);
        reject_symlinked_ancestors(root, &target)?;
        match (op.kind, op.source) {
            (OperationKind::Copy, Some(_)) if op.path.is_dir() => {
                io::create_dir(&target)?;
                Ok(format!("Created directory {}", target.display()))
            }
            (OperationKind::Copy, Some(source)) => {
                let from = op.path.to_native(self.root(source)?);
                let bytes = io::copy_file_atomic(&from, &target)?;
                Ok(format!(
                    "Copied {} to {} ({bytes} bytes)",
                    from.display(),
                    target.display()
                ))
            }
            (OperationKind::Copy, None) => Err(Error::invalid_strategy(format!(
                "copy of {} has no source location",
                op.path
            ))),
            (OperationKind::Delete, _) => {
                io::remove_entry(&target)?;
                Ok(format!("Deleted {}", target.display()))
            }
        }
    }
}

/// Fail if any directory strictly between `root` and `target` is a symlink.
/// Entries that do not exist yet are fine.
fn reject_symlinked_ancestors(root: &Path, target: &Path) -> Result<()> {
    for ancestor in target.ancestors().skip(1) {
        if ancestor == root || !ancestor.starts_with(root) {
            break;
        }
        if std::fs::symlink_metadata(ancestor).is_ok_and(|m| m.file_type().is_symlink()) {
            return Err(Error::SymlinkedAncestor {
                path: target.to_path_buf(),
                link: ancestor.to_path_buf(),
            });
        }
    }
    Ok(())
}
