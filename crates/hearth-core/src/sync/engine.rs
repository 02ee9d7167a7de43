//! SyncEngine implementation
//!
//! The SyncEngine drives the whole pipeline over a list of locations: one
//! concurrent walk per location, then diffing and reconciliation once every
//! tree is complete.

use std::path::PathBuf;

use hearth_fs::{DirectoryTree, TreeBuilder};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::diff::{DiffResult, StarDiff, diff};
use crate::reconcile::{Plan, SyncStrategy, reconcile};
use crate::{Error, Result};

/// Engine for comparing and reconciling a set of locations
///
/// Locations are identified by their position: the first path given is
/// [`LocationId(0)`](crate::LocationId), and so on.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    locations: Vec<PathBuf>,
    name: Option<String>,
}

impl SyncEngine {
    /// Create an engine over `locations`, in order.
    pub fn new<I, P>(locations: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            locations: locations.into_iter().map(Into::into).collect(),
            name: None,
        }
    }

    /// Give every scanned tree the logical root name `name`.
    ///
    /// Without it each tree is named after its own root directory, so
    /// locations with different directory names cannot be diffed.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    /// Build one tree per location, in location order.
    ///
    /// Each walk runs on its own blocking task. The first failing walk
    /// cancels the others; `cancel` itself is only ever observed.
    ///
    /// # Errors
    ///
    /// Returns the first walk error, preferring a real failure over the
    /// cancellations it triggered, or [`Error::Join`] if a walk task panicked.
    pub async fn scan(&self, cancel: &CancellationToken) -> Result<Vec<DirectoryTree>> {
        let siblings = cancel.child_token();
        let mut tasks = JoinSet::new();

        for (index, root) in self.locations.iter().enumerate() {
            let mut builder = TreeBuilder::new(root.clone()).with_cancellation(siblings.clone());
            if let Some(name) = &self.name {
                builder = builder.named(name.clone());
            }
            tasks.spawn_blocking(move || (index, builder.build()));
        }

        let mut trees: Vec<Option<DirectoryTree>> = self.locations.iter().map(|_| None).collect();
        let mut failure: Option<Error> = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(tree))) => {
                    debug!(
                        location = index,
                        root = %self.locations[index].display(),
                        entries = tree.entry_count(),
                        "Scanned location"
                    );
                    trees[index] = Some(tree);
                }
                Ok((index, Err(e))) => {
                    debug!(location = index, error = %e, "Scan failed");
                    siblings.cancel();
                    record_failure(&mut failure, e.into());
                }
                Err(e) => {
                    siblings.cancel();
                    record_failure(
                        &mut failure,
                        Error::Join {
                            message: e.to_string(),
                        },
                    );
                }
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }
        trees
            .into_iter()
            .map(|tree| {
                tree.ok_or_else(|| Error::Join {
                    message: "walk finished without a tree".to_string(),
                })
            })
            .collect()
    }

    /// Scan the first two locations and diff them.
    ///
    /// # Errors
    ///
    /// [`Error::NotEnoughLocations`] unless exactly two locations were
    /// given, plus any scan or diff error.
    pub async fn compare(&self, cancel: &CancellationToken) -> Result<DiffResult> {
        if self.locations.len() != 2 {
            return Err(Error::NotEnoughLocations {
                needed: 2,
                found: self.locations.len(),
            });
        }
        let trees = self.scan(cancel).await?;
        diff(&trees[0], &trees[1])
    }

    /// Scan every location and reconcile them under `strategy`.
    ///
    /// The strategy is checked before anything is scanned.
    ///
    /// # Errors
    ///
    /// [`Error::NotEnoughLocations`] for fewer than two locations,
    /// [`Error::InvalidStrategy`], or any scan or diff error. No plan is
    /// returned unless every location scanned cleanly.
    pub async fn plan(&self, strategy: &SyncStrategy, cancel: &CancellationToken) -> Result<Plan> {
        if self.locations.len() < 2 {
            return Err(Error::NotEnoughLocations {
                needed: 2,
                found: self.locations.len(),
            });
        }
        strategy.validate(self.locations.len())?;

        let trees = self.scan(cancel).await?;
        let diffs = StarDiff::compute(&trees, strategy.hub())?;
        reconcile(&diffs, strategy)
    }
}

fn record_failure(slot: &mut Option<Error>, error: Error) {
    match slot {
        None => *slot = Some(error),
        Some(existing) if existing.is_cancelled() && !error.is_cancelled() => *slot = Some(error),
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_failure_replaces_cancellation() {
        let cancelled: Error = hearth_fs::Error::from(hearth_fs::WalkError::Cancelled {
            root: PathBuf::from("/a"),
        })
        .into();
        let missing: Error = hearth_fs::Error::from(hearth_fs::WalkError::NotADirectory {
            path: PathBuf::from("/b"),
        })
        .into();

        let mut slot = Some(cancelled);
        record_failure(&mut slot, missing);
        assert!(matches!(slot, Some(ref e) if !e.is_cancelled()));
    }

    #[test]
    fn first_real_failure_is_kept() {
        let first: Error = hearth_fs::Error::from(hearth_fs::WalkError::NotADirectory {
            path: PathBuf::from("/first"),
        })
        .into();
        let second: Error = hearth_fs::Error::from(hearth_fs::WalkError::NotADirectory {
            path: PathBuf::from("/second"),
        })
        .into();

        let mut slot = None;
        record_failure(&mut slot, first);
        record_failure(&mut slot, second);
        assert!(slot.unwrap().to_string().contains("/first"));
    }

    #[tokio::test]
    async fn plan_needs_two_locations() {
        let engine = SyncEngine::new(["/only"]);
        let strategy = SyncStrategy::new(crate::StrategyKind::NewFilesOnly, None);

        let err = engine
            .plan(&strategy, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotEnoughLocations { found: 1, .. }));
    }
}
