//! CouncilScheduler: the privileged fallback track.
//!
//! The council may schedule only while the voter body has no qualifying
//! decision, and anyone may veto a council schedule once the voter body does.

use upgov_types::{Address, GovernanceParams, Timestamp};

use crate::epoch::{Epoch, ScheduledUpgrade};
use crate::error::GovernanceError;
use crate::event::GovernanceEvent;

pub struct CouncilScheduler<'a> {
    params: &'a GovernanceParams,
}

impl<'a> CouncilScheduler<'a> {
    pub fn new(params: &'a GovernanceParams) -> Self {
        Self { params }
    }

    fn ensure_council(epoch: &Epoch, caller: &Address) -> Result<(), GovernanceError> {
        if *caller != epoch.council {
            return Err(GovernanceError::UnauthorizedCaller {
                caller: *caller,
                council: epoch.council,
            });
        }
        Ok(())
    }

    pub fn schedule(
        &self,
        epoch: &mut Epoch,
        caller: &Address,
        implementation: &Address,
        total_supply: u128,
        now: Timestamp,
    ) -> Result<GovernanceEvent, GovernanceError> {
        Self::ensure_council(epoch, caller)?;
        if implementation.is_zero() {
            return Err(GovernanceError::ImplementationZero);
        }
        let qualification = epoch.qualification(self.params, total_supply);
        if qualification.is_met() {
            return Err(qualification.reached());
        }
        // A pending voter-body schedule blocks the council as well: at most
        // one track may hold a schedule.
        if let Some(existing) = epoch.council_schedule.or(epoch.voter_body_schedule) {
            return Err(GovernanceError::UpgradeAlreadyScheduled {
                implementation: existing.implementation,
                end_time: existing.end_time,
            });
        }

        let end_time = now.saturating_add_secs(self.params.delay_duration_secs);
        epoch.council_schedule = Some(ScheduledUpgrade {
            implementation: *implementation,
            end_time,
        });
        Ok(GovernanceEvent::CouncilUpgradeScheduled {
            epoch: epoch.id,
            implementation: *implementation,
            end_time,
        })
    }

    /// The council withdraws its own schedule. No delay or qualification
    /// conditions apply.
    pub fn cancel(&self, epoch: &mut Epoch, caller: &Address) -> Result<GovernanceEvent, GovernanceError> {
        Self::ensure_council(epoch, caller)?;
        let scheduled = epoch
            .council_schedule
            .take()
            .ok_or(GovernanceError::UpgradeNotScheduled)?;
        Ok(GovernanceEvent::CouncilUpgradeCancelled {
            epoch: epoch.id,
            implementation: scheduled.implementation,
        })
    }

    /// Voter-body override: clears the council track once the voter body
    /// qualifies. Callable by anyone.
    pub fn veto(&self, epoch: &mut Epoch, total_supply: u128) -> Result<GovernanceEvent, GovernanceError> {
        let qualification = epoch.qualification(self.params, total_supply);
        if !qualification.is_met() {
            return Err(qualification.not_reached());
        }
        let vetoed = epoch.council_schedule.take();
        Ok(GovernanceEvent::CouncilUpgradeVetoed {
            epoch: epoch.id,
            implementation: vetoed.map(|s| s.implementation),
        })
    }

    pub fn transfer_council(
        &self,
        epoch: &mut Epoch,
        caller: &Address,
        new_council: &Address,
    ) -> Result<GovernanceEvent, GovernanceError> {
        Self::ensure_council(epoch, caller)?;
        if new_council.is_zero() {
            return Err(GovernanceError::InvalidCouncil(*new_council));
        }
        let previous = std::mem::replace(&mut epoch.council, *new_council);
        Ok(GovernanceEvent::CouncilTransferred {
            epoch: epoch.id,
            previous,
            council: *new_council,
        })
    }
}
