//! Location identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a location in the ordered list handed to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub usize);

impl LocationId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every location id for `count` locations, in order.
pub fn location_ids(count: usize) -> impl Iterator<Item = LocationId> {
    (0..count).map(LocationId)
}
