//! Governance engine: owns the epoch records and routes every operation to
//! the component that implements it.
//!
//! Each operation runs against the current [`Epoch`] only. Components validate
//! before they mutate, so an error leaves the epoch exactly as it was. On
//! success the engine traces and publishes the resulting events.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use upgov_types::{Address, EpochId, GovernanceParams, Timestamp};

use crate::authorizer::{UpgradeAuthorizer, UpgradeTrack};
use crate::council::CouncilScheduler;
use crate::epoch::{Epoch, ScheduledUpgrade};
use crate::error::GovernanceError;
use crate::event::{EventBus, GovernanceEvent};
use crate::lock::LockLedger;
use crate::voter_body::VoterBodyScheduler;
use crate::votes::VoteTracker;

/// Point-in-time summary of the current epoch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceStatus {
    pub epoch: EpochId,
    pub locked_supply: u128,
    pub quorum_threshold: u128,
    pub min_locked_supply: u128,
    pub most_voted: Option<Address>,
    pub most_voted_votes: u128,
    pub qualifies: bool,
    pub voter_body_schedule: Option<ScheduledUpgrade>,
    pub council_schedule: Option<ScheduledUpgrade>,
    pub council: Address,
}

#[derive(Debug)]
pub struct GovernanceEngine {
    params: GovernanceParams,
    current: Epoch,
    /// Finished epochs, kept for inspection only.
    archive: HashMap<EpochId, Epoch>,
    events: EventBus<GovernanceEvent>,
}

impl GovernanceEngine {
    pub fn new(params: GovernanceParams, council: Address) -> Result<Self, GovernanceError> {
        Self::restore(params, Epoch::new(EpochId::GENESIS, council))
    }

    /// Resume from a previously captured epoch record.
    pub fn restore(params: GovernanceParams, current: Epoch) -> Result<Self, GovernanceError> {
        params
            .validate()
            .map_err(|e| GovernanceError::InvalidParams(e.to_string()))?;
        if current.council.is_zero() {
            return Err(GovernanceError::InvalidCouncil(current.council));
        }
        Ok(Self {
            params,
            current,
            archive: HashMap::new(),
            events: EventBus::new(),
        })
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    fn publish(&self, events: &[GovernanceEvent]) {
        for event in events {
            event.trace();
            self.events.emit(event);
        }
    }

    // ── Epochs ──────────────────────────────────────────────────────────

    pub fn current_epoch(&self) -> EpochId {
        self.current.id
    }

    pub fn current(&self) -> &Epoch {
        &self.current
    }

    /// Look up the current or any finished epoch.
    pub fn epoch(&self, id: EpochId) -> Option<&Epoch> {
        if id == self.current.id {
            Some(&self.current)
        } else {
            self.archive.get(&id)
        }
    }

    /// Start a fresh epoch. Called once an authorised upgrade has switched
    /// the implementation; nothing is cleared, the old record is just retired.
    /// The council identity carries over.
    pub fn advance_epoch(&mut self) -> EpochId {
        let previous = self.current.id;
        let next = Epoch::new(previous.next(), self.current.council);
        let finished = std::mem::replace(&mut self.current, next);
        self.archive.insert(previous, finished);
        let epoch = self.current.id;
        self.publish(&[GovernanceEvent::EpochAdvanced { previous, epoch }]);
        epoch
    }

    // ── Views ───────────────────────────────────────────────────────────

    pub fn locked_balance(&self, account: &Address) -> u128 {
        self.current.locked_balance(account)
    }

    pub fn unlocked_balance(&self, account: &Address, balance: u128) -> u128 {
        LockLedger.unlocked_balance(&self.current, account, balance)
    }

    pub fn locked_supply(&self) -> u128 {
        self.current.locked_supply
    }

    pub fn votum(&self, voter: &Address, implementation: &Address) -> u128 {
        self.current.votum(voter, implementation)
    }

    pub fn total_votes(&self, implementation: &Address) -> u128 {
        self.current.total_votes(implementation)
    }

    pub fn most_voted_implementation(&self) -> Option<Address> {
        self.current.most_voted
    }

    pub fn quorum_threshold(&self) -> u128 {
        self.params.quorum_threshold(self.current.locked_supply)
    }

    pub fn min_locked_supply(&self, total_supply: u128) -> u128 {
        self.params.min_locked_supply(total_supply)
    }

    pub fn meets_quorum_and_min_locked_supply(&self, total_supply: u128) -> bool {
        self.current.qualification(&self.params, total_supply).is_met()
    }

    pub fn voter_body_schedule(&self) -> Option<ScheduledUpgrade> {
        self.current.voter_body_schedule
    }

    pub fn council_schedule(&self) -> Option<ScheduledUpgrade> {
        self.current.council_schedule
    }

    pub fn council(&self) -> Address {
        self.current.council
    }

    pub fn status(&self, total_supply: u128) -> GovernanceStatus {
        let q = self.current.qualification(&self.params, total_supply);
        GovernanceStatus {
            epoch: self.current.id,
            locked_supply: q.locked_supply,
            quorum_threshold: q.quorum_threshold,
            min_locked_supply: q.min_locked_supply,
            most_voted: q.implementation,
            most_voted_votes: q.total_votes,
            qualifies: q.is_met(),
            voter_body_schedule: self.current.voter_body_schedule,
            council_schedule: self.current.council_schedule,
            council: self.current.council,
        }
    }

    // ── LockLedger ──────────────────────────────────────────────────────

    /// Lock `value` of `account`'s ledger `balance`.
    pub fn lock(&mut self, account: &Address, value: u128, balance: u128) -> Result<(), GovernanceError> {
        let event = LockLedger
            .lock(&mut self.current, account, value, balance)
            .inspect_err(|e| tracing::debug!(%account, value, error = %e, "lock rejected"))?;
        self.publish(&[event]);
        Ok(())
    }

    /// Balance-decrease guard for the ledger.
    pub fn check_decrease(&self, account: &Address, balance: u128, value: u128) -> Result<(), GovernanceError> {
        LockLedger.check_decrease(&self.current, account, balance, value)
    }

    // ── VoteTracker ─────────────────────────────────────────────────────

    pub fn cast_vote(&mut self, voter: &Address, implementation: &Address) -> Result<(), GovernanceError> {
        let events = VoteTracker
            .cast_vote(&mut self.current, voter, implementation)
            .inspect_err(|e| tracing::debug!(%voter, %implementation, error = %e, "vote rejected"))?;
        self.publish(&events);
        Ok(())
    }

    pub fn revoke_vote(&mut self, voter: &Address, implementation: &Address) -> Result<(), GovernanceError> {
        let event = VoteTracker
            .revoke_vote(&mut self.current, voter, implementation)
            .inspect_err(|e| tracing::debug!(%voter, %implementation, error = %e, "revoke rejected"))?;
        self.publish(&[event]);
        Ok(())
    }

    // ── VoterBodyScheduler ──────────────────────────────────────────────

    pub fn schedule_voter_body_upgrade(
        &mut self,
        total_supply: u128,
        now: Timestamp,
    ) -> Result<ScheduledUpgrade, GovernanceError> {
        let events = VoterBodyScheduler::new(&self.params)
            .schedule(&mut self.current, total_supply, now)
            .inspect_err(|e| tracing::debug!(error = %e, "voter body schedule rejected"))?;
        self.publish(&events);
        self.current
            .voter_body_schedule
            .ok_or(GovernanceError::UpgradeNotScheduled)
    }

    pub fn cancel_voter_body_upgrade(&mut self, total_supply: u128, now: Timestamp) -> Result<(), GovernanceError> {
        let event = VoterBodyScheduler::new(&self.params)
            .cancel(&mut self.current, total_supply, now)
            .inspect_err(|e| tracing::debug!(error = %e, "voter body cancellation rejected"))?;
        self.publish(&[event]);
        Ok(())
    }

    // ── CouncilScheduler ────────────────────────────────────────────────

    pub fn schedule_council_upgrade(
        &mut self,
        caller: &Address,
        implementation: &Address,
        total_supply: u128,
        now: Timestamp,
    ) -> Result<ScheduledUpgrade, GovernanceError> {
        let event = CouncilScheduler::new(&self.params)
            .schedule(&mut self.current, caller, implementation, total_supply, now)
            .inspect_err(|e| tracing::debug!(%caller, %implementation, error = %e, "council schedule rejected"))?;
        self.publish(&[event]);
        self.current
            .council_schedule
            .ok_or(GovernanceError::UpgradeNotScheduled)
    }

    pub fn cancel_council_upgrade(&mut self, caller: &Address) -> Result<(), GovernanceError> {
        let event = CouncilScheduler::new(&self.params)
            .cancel(&mut self.current, caller)
            .inspect_err(|e| tracing::debug!(%caller, error = %e, "council cancellation rejected"))?;
        self.publish(&[event]);
        Ok(())
    }

    pub fn veto_council_upgrade(&mut self, total_supply: u128) -> Result<(), GovernanceError> {
        let event = CouncilScheduler::new(&self.params)
            .veto(&mut self.current, total_supply)
            .inspect_err(|e| tracing::debug!(error = %e, "veto rejected"))?;
        self.publish(&[event]);
        Ok(())
    }

    pub fn transfer_council(&mut self, caller: &Address, new_council: &Address) -> Result<(), GovernanceError> {
        let event = CouncilScheduler::new(&self.params)
            .transfer_council(&mut self.current, caller, new_council)
            .inspect_err(|e| tracing::debug!(%caller, %new_council, error = %e, "council transfer rejected"))?;
        self.publish(&[event]);
        Ok(())
    }

    // ── UpgradeAuthorizer ───────────────────────────────────────────────

    /// Decide whether the proxy may switch to `candidate` now.
    pub fn authorize_upgrade(
        &self,
        candidate: &Address,
        total_supply: u128,
        now: Timestamp,
    ) -> Result<UpgradeTrack, GovernanceError> {
        UpgradeAuthorizer::new(&self.params)
            .authorize(&self.current, candidate, total_supply, now)
            .inspect_err(|e| tracing::warn!(%candidate, error = %e, "upgrade not authorized"))
    }
}
