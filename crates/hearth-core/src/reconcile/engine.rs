//! Turning diffs and a strategy into a plan
//!
//! Pure computation over already built diffs; nothing here touches the
//! filesystem.

use std::collections::{BTreeMap, HashSet};

use hearth_fs::SegmentPath;
use tracing::{debug, warn};

use super::plan::{Conflict, Operation, Plan};
use super::strategy::{StrategyKind, SyncStrategy};
use crate::diff::StarDiff;
use crate::location::{LocationId, location_ids};
use crate::ordering::into_sorted;
use crate::{Error, Result};

/// Compute the plan that applies `strategy` to the locations in `diffs`.
///
/// # Errors
///
/// Returns [`Error::InvalidStrategy`] when the strategy needs a master and has
/// none, when the master is out of range, or when `diffs` were computed
/// around a location other than the master.
pub fn reconcile(diffs: &StarDiff, strategy: &SyncStrategy) -> Result<Plan> {
    strategy.validate(diffs.location_count())?;
    if let Some(master) = strategy.master()
        && master != diffs.hub()
    {
        return Err(Error::invalid_strategy(format!(
            "diffs were computed around {}, not master {master}",
            diffs.hub()
        )));
    }

    let mut builder = PlanBuilder::new(diffs);
    match (strategy.kind(), strategy.master()) {
        (StrategyKind::NewFilesOnly, _) => spread_unique(diffs, &mut builder),
        (kind, Some(master)) => follow_master(diffs, kind, master, &mut builder),
        (kind, None) => {
            return Err(Error::invalid_strategy(format!(
                "{kind} requires a master location"
            )));
        }
    }

    let plan = builder.finish(*strategy);
    debug!(
        strategy = %strategy.kind(),
        operations = plan.len(),
        conflicts = plan.conflicts().len(),
        "Reconciled locations"
    );
    Ok(plan)
}

fn follow_master(
    diffs: &StarDiff,
    kind: StrategyKind,
    master: LocationId,
    builder: &mut PlanBuilder<'_>,
) {
    for (location, diff) in diffs.spokes() {
        if kind.delete_non_master() {
            for path in diff.only_in_b() {
                builder.delete(location, path);
            }
        }
        if kind.add_from_master() {
            for path in diff.only_in_a() {
                builder.copy(master, location, path);
            }
        }
    }
}

/// Every path held by exactly one location goes to all the others.
fn spread_unique(diffs: &StarDiff, builder: &mut PlanBuilder<'_>) {
    for (path, holders) in diffs.presence() {
        let mut holders = holders.into_iter();
        let (Some(source), None) = (holders.next(), holders.next()) else {
            continue;
        };
        for target in location_ids(diffs.location_count()).filter(|&t| t != source) {
            builder.copy(source, target, path);
        }
    }
}

struct PlanBuilder<'a> {
    diffs: &'a StarDiff,
    deletes: BTreeMap<LocationId, HashSet<SegmentPath>>,
    copies: BTreeMap<LocationId, Vec<(SegmentPath, LocationId)>>,
    conflicts: Vec<Conflict>,
}

impl<'a> PlanBuilder<'a> {
    fn new(diffs: &'a StarDiff) -> Self {
        Self {
            diffs,
            deletes: BTreeMap::new(),
            copies: BTreeMap::new(),
            conflicts: Vec::new(),
        }
    }

    fn delete(&mut self, target: LocationId, path: &SegmentPath) {
        self.deletes.entry(target).or_default().insert(path.clone());
    }

    /// Deletes for `target` must be recorded before its copies.
    fn copy(&mut self, source: LocationId, target: LocationId, path: &SegmentPath) {
        if let Some(existing) = self.blocking_entry(target, path) {
            let conflict = Conflict {
                target,
                path: path.clone(),
                source,
                existing,
            };
            warn!("Skipping copy: {conflict}");
            self.conflicts.push(conflict);
            return;
        }
        self.copies
            .entry(target)
            .or_default()
            .push((path.clone(), source));
    }

    /// An entry in `target` that would make copying `path` there collide: the
    /// same name with the other kind, at the path itself or one of its parent
    /// directories, and not about to be deleted.
    fn blocking_entry(&self, target: LocationId, path: &SegmentPath) -> Option<SegmentPath> {
        let scheduled = self.deletes.get(&target);
        (1..=path.depth()).find_map(|depth| {
            let expected_dir = depth < path.depth() || path.is_dir();
            let opposite = path.truncated(depth, !expected_dir)?;
            let doomed = scheduled.is_some_and(|d| d.contains(&opposite));
            (self.diffs.holds(target, &opposite) && !doomed).then_some(opposite)
        })
    }

    fn finish(self, strategy: SyncStrategy) -> Plan {
        let mut deletes = self.deletes;
        let mut copies = self.copies;
        let mut operations = Vec::new();

        for target in location_ids(self.diffs.location_count()) {
            if let Some(paths) = deletes.remove(&target) {
                let mut paths = into_sorted(paths);
                paths.reverse();
                operations.extend(paths.into_iter().map(|p| Operation::delete(target, p)));
            }
            if let Some(entries) = copies.remove(&target) {
                operations.extend(
                    into_sorted(entries)
                        .into_iter()
                        .map(|(path, source)| Operation::copy(source, target, path)),
                );
            }
        }

        Plan::new(strategy, operations, into_sorted(self.conflicts))
    }
}
