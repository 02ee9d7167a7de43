//! N-way diffs around a hub location

use std::collections::{BTreeSet, HashMap};

use hearth_fs::{DirectoryTree, SegmentPath};

use super::{DiffResult, diff};
use crate::location::{LocationId, location_ids};
use crate::{Error, Result};

/// One [`DiffResult`] between a hub location (side A) and every other
/// location (side B).
///
/// This is everything reconciliation needs: the presence of any path in any
/// location can be recovered from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarDiff {
    hub: LocationId,
    diffs: Vec<Option<DiffResult>>,
}

impl StarDiff {
    /// Diff `trees[hub]` against every other tree.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidStrategy`] when there are no trees or `hub`
    /// is out of range, and with [`Error::IncompatibleRoots`] when any tree's
    /// root name differs from the hub's.
    pub fn compute(trees: &[DirectoryTree], hub: LocationId) -> Result<Self> {
        let Some(hub_tree) = trees.get(hub.index()) else {
            return Err(Error::invalid_strategy(format!(
                "location {hub} is out of range for {} location(s)",
                trees.len()
            )));
        };

        let diffs = trees
            .iter()
            .enumerate()
            .map(|(i, tree)| {
                if i == hub.index() {
                    Ok(None)
                } else {
                    diff(hub_tree, tree).map(Some)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { hub, diffs })
    }

    /// Assemble from diffs computed elsewhere. `spokes` holds one diff per
    /// non-hub location, in location order, each with the hub as side A.
    pub fn from_diffs(hub: LocationId, spokes: Vec<DiffResult>) -> Result<Self> {
        let location_count = spokes.len() + 1;
        if hub.index() >= location_count {
            return Err(Error::invalid_strategy(format!(
                "location {hub} is out of range for {location_count} location(s)"
            )));
        }

        let mut spokes = spokes.into_iter();
        let diffs = location_ids(location_count)
            .map(|id| if id == hub { None } else { spokes.next() })
            .collect();
        Ok(Self { hub, diffs })
    }

    pub fn hub(&self) -> LocationId {
        self.hub
    }

    pub fn location_count(&self) -> usize {
        self.diffs.len()
    }

    /// The diff between the hub and `location`; `None` for the hub itself.
    pub fn diff_with(&self, location: LocationId) -> Option<&DiffResult> {
        self.diffs.get(location.index()).and_then(Option::as_ref)
    }

    /// Every non-hub location with its diff against the hub.
    pub fn spokes(&self) -> impl Iterator<Item = (LocationId, &DiffResult)> {
        self.diffs
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.as_ref().map(|d| (LocationId(i), d)))
    }

    /// Whether `location` holds `path`.
    pub fn holds(&self, location: LocationId, path: &SegmentPath) -> bool {
        if location == self.hub {
            return self.spokes().next().is_some_and(|(_, d)| d.in_a(path));
        }
        self.diff_with(location).is_some_and(|d| d.in_b(path))
    }

    /// For every path seen anywhere, the locations that hold it.
    pub fn presence(&self) -> HashMap<&SegmentPath, BTreeSet<LocationId>> {
        let mut presence: HashMap<&SegmentPath, BTreeSet<LocationId>> = HashMap::new();
        for (location, diff) in self.spokes() {
            for path in diff.only_in_a().iter().chain(diff.in_both()) {
                presence.entry(path).or_default().insert(self.hub);
            }
            for path in diff.only_in_b().iter().chain(diff.in_both()) {
                presence.entry(path).or_default().insert(location);
            }
        }
        presence
    }
}
