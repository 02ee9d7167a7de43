//! Synchronization strategies

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::location::LocationId;
use crate::{Error, Result};

/// How locations should converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Mirror the master: delete what it lacks, copy what only it has.
    TrueMasterCopy,
    /// Spread data found in only one location to all the others. Never deletes.
    NewFilesOnly,
    /// Copy what only the master has; keep everything else.
    AddByMasterCopy,
    /// Delete what the master lacks; copy nothing.
    TrimByMasterCopy,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::TrueMasterCopy,
        StrategyKind::NewFilesOnly,
        StrategyKind::AddByMasterCopy,
        StrategyKind::TrimByMasterCopy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::TrueMasterCopy => "true-master-copy",
            StrategyKind::NewFilesOnly => "new-files-only",
            StrategyKind::AddByMasterCopy => "add-by-master-copy",
            StrategyKind::TrimByMasterCopy => "trim-by-master-copy",
        }
    }

    /// Whether entries missing from the master are deleted elsewhere.
    pub fn delete_non_master(self) -> bool {
        matches!(
            self,
            StrategyKind::TrueMasterCopy | StrategyKind::TrimByMasterCopy
        )
    }

    /// Whether data found outside the master is spread to other locations.
    pub fn add_from_non_master(self) -> bool {
        matches!(self, StrategyKind::NewFilesOnly)
    }

    /// Whether data only the master holds is copied out.
    pub fn add_from_master(self) -> bool {
        matches!(
            self,
            StrategyKind::TrueMasterCopy | StrategyKind::AddByMasterCopy
        )
    }

    pub fn requires_master(self) -> bool {
        !matches!(self, StrategyKind::NewFilesOnly)
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    /// Accepts `TrueMasterCopy`, `true-master-copy` and `true_master_copy`
    /// spellings in any case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "truemastercopy" => Ok(StrategyKind::TrueMasterCopy),
            "newfilesonly" => Ok(StrategyKind::NewFilesOnly),
            "addbymastercopy" => Ok(StrategyKind::AddByMasterCopy),
            "trimbymastercopy" => Ok(StrategyKind::TrimByMasterCopy),
            _ => Err(Error::invalid_strategy(format!(
                "unknown strategy '{s}' (expected one of: {})",
                StrategyKind::ALL.map(StrategyKind::as_str).join(", ")
            ))),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy plus the location it treats as authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStrategy {
    kind: StrategyKind,
    master: Option<LocationId>,
}

impl SyncStrategy {
    pub fn new(kind: StrategyKind, master: Option<LocationId>) -> Self {
        Self { kind, master }
    }

    pub fn with_master(kind: StrategyKind, master: LocationId) -> Self {
        Self::new(kind, Some(master))
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn master(&self) -> Option<LocationId> {
        self.master
    }

    pub fn delete_non_master(&self) -> bool {
        self.kind.delete_non_master()
    }

    pub fn add_from_non_master(&self) -> bool {
        self.kind.add_from_non_master()
    }

    /// The location diffs should be computed around: the master when one is
    /// set, the first location otherwise.
    pub fn hub(&self) -> LocationId {
        self.master.unwrap_or(LocationId(0))
    }

    /// Check the strategy against the number of locations taking part.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStrategy`] when a required master is unset or the
    /// master is out of range.
    pub fn validate(&self, location_count: usize) -> Result<()> {
        match self.master {
            None if self.kind.requires_master() => Err(Error::invalid_strategy(format!(
                "{} requires a master location",
                self.kind
            ))),
            Some(master) if master.index() >= location_count => {
                Err(Error::invalid_strategy(format!(
                    "master {master} is out of range for {location_count} location(s)"
                )))
            }
            _ => Ok(()),
        }
    }
}
