//! The per-epoch governance record.
//!
//! An [`Epoch`] holds everything governance knows while one implementation is
//! active: locked balances, ballots, the most-voted pointer, both schedules and
//! the council identity. It is passed explicitly into every component; there is
//! no ambient state. When an upgrade executes the engine starts a new, empty
//! `Epoch` and the old one is never mutated again.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use upgov_types::{Address, EpochId, GovernanceParams, Timestamp};

use crate::error::GovernanceError;

/// Aggregate votes for one proposed implementation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub(crate) total_votes: u128,
    /// voter → votum. Voters with a zero votum are removed.
    pub(crate) votes: HashMap<Address, u128>,
}

impl Ballot {
    pub fn total_votes(&self) -> u128 {
        self.total_votes
    }

    pub fn votum(&self, voter: &Address) -> u128 {
        self.votes.get(voter).copied().unwrap_or(0)
    }

    pub fn voter_count(&self) -> usize {
        self.votes.len()
    }

    pub fn voters(&self) -> impl Iterator<Item = (&Address, u128)> {
        self.votes.iter().map(|(voter, votum)| (voter, *votum))
    }
}

/// A pending upgrade on either track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledUpgrade {
    pub implementation: Address,
    /// Earliest time the upgrade may execute (inclusive).
    pub end_time: Timestamp,
}

/// The voter body's standing: the most-voted implementation measured against
/// quorum and minimum locked supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualification {
    pub implementation: Option<Address>,
    pub total_votes: u128,
    pub quorum_threshold: u128,
    pub locked_supply: u128,
    pub min_locked_supply: u128,
}

impl Qualification {
    /// Strictly more votes than the quorum threshold and enough supply locked.
    pub fn is_met(&self) -> bool {
        self.total_votes > self.quorum_threshold && self.locked_supply >= self.min_locked_supply
    }

    pub(crate) fn not_reached(&self) -> GovernanceError {
        GovernanceError::QuorumOrMinLockedSupplyNotReached {
            implementation: self.implementation,
            total_votes: self.total_votes,
            quorum_threshold: self.quorum_threshold,
            locked_supply: self.locked_supply,
            min_locked_supply: self.min_locked_supply,
        }
    }

    pub(crate) fn reached(&self) -> GovernanceError {
        GovernanceError::QuorumAndMinLockedSupplyReached {
            implementation: self.implementation,
            total_votes: self.total_votes,
            quorum_threshold: self.quorum_threshold,
            locked_supply: self.locked_supply,
            min_locked_supply: self.min_locked_supply,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    pub(crate) id: EpochId,
    pub(crate) locked: HashMap<Address, u128>,
    pub(crate) locked_supply: u128,
    pub(crate) ballots: HashMap<Address, Ballot>,
    /// `None` until the first vote with non-zero weight.
    pub(crate) most_voted: Option<Address>,
    pub(crate) voter_body_schedule: Option<ScheduledUpgrade>,
    pub(crate) council_schedule: Option<ScheduledUpgrade>,
    pub(crate) council: Address,
}

impl Epoch {
    pub fn new(id: EpochId, council: Address) -> Self {
        Self {
            id,
            locked: HashMap::new(),
            locked_supply: 0,
            ballots: HashMap::new(),
            most_voted: None,
            voter_body_schedule: None,
            council_schedule: None,
            council,
        }
    }

    pub fn id(&self) -> EpochId {
        self.id
    }

    pub fn locked_balance(&self, account: &Address) -> u128 {
        self.locked.get(account).copied().unwrap_or(0)
    }

    pub fn locked_supply(&self) -> u128 {
        self.locked_supply
    }

    pub fn locked_accounts(&self) -> impl Iterator<Item = (&Address, u128)> {
        self.locked.iter().map(|(account, locked)| (account, *locked))
    }

    pub fn ballot(&self, implementation: &Address) -> Option<&Ballot> {
        self.ballots.get(implementation)
    }

    pub fn ballots(&self) -> impl Iterator<Item = (&Address, &Ballot)> {
        self.ballots.iter()
    }

    pub fn votum(&self, voter: &Address, implementation: &Address) -> u128 {
        self.ballots
            .get(implementation)
            .map_or(0, |b| b.votum(voter))
    }

    pub fn total_votes(&self, implementation: &Address) -> u128 {
        self.ballots
            .get(implementation)
            .map_or(0, |b| b.total_votes)
    }

    pub fn most_voted(&self) -> Option<Address> {
        self.most_voted
    }

    pub fn voter_body_schedule(&self) -> Option<ScheduledUpgrade> {
        self.voter_body_schedule
    }

    pub fn council_schedule(&self) -> Option<ScheduledUpgrade> {
        self.council_schedule
    }

    pub fn council(&self) -> Address {
        self.council
    }

    /// Evaluate the current most-voted implementation against the thresholds.
    ///
    /// Reads the pointer target's live total, so a pointer left stale by a
    /// revoke can only make this fail, never pass.
    pub fn qualification(&self, params: &GovernanceParams, total_supply: u128) -> Qualification {
        let total_votes = self.most_voted.map_or(0, |imp| self.total_votes(&imp));
        Qualification {
            implementation: self.most_voted,
            total_votes,
            quorum_threshold: params.quorum_threshold(self.locked_supply),
            locked_supply: self.locked_supply,
            min_locked_supply: params.min_locked_supply(total_supply),
        }
    }

    /// Sum of per-account locked balances. Used by invariant checks.
    pub fn sum_of_locked(&self) -> u128 {
        self.locked
            .values()
            .fold(0u128, |acc, locked| acc.saturating_add(*locked))
    }
}

/// Fail unless the schedule exists and its delay window has elapsed.
pub(crate) fn ensure_delay_elapsed(
    schedule: Option<&ScheduledUpgrade>,
    now: Timestamp,
) -> Result<(), GovernanceError> {
    let schedule = schedule.ok_or(GovernanceError::DelayPeriodNotStarted)?;
    if !schedule.end_time.has_passed(now) {
        return Err(GovernanceError::DelayPeriodNotEnded {
            end_time: schedule.end_time,
            now,
        });
    }
    Ok(())
}
