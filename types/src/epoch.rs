//! Governance epoch identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential identifier of a governance epoch.
///
/// One epoch spans the lifetime of one active implementation. Executing an
/// upgrade moves to [`EpochId::next`]; nothing keyed by an older id is read again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EpochId(u64);

impl EpochId {
    pub const GENESIS: Self = Self(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for EpochId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch#{}", self.0)
    }
}
