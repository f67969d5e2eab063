//! VoterBodyScheduler: the token holders' upgrade track.
//!
//! Anyone may schedule the most-voted implementation once it clears quorum and
//! the minimum locked supply. Scheduling always pre-empts a pending council
//! upgrade.

use upgov_types::{GovernanceParams, Timestamp};

use crate::epoch::{ensure_delay_elapsed, Epoch, ScheduledUpgrade};
use crate::error::GovernanceError;
use crate::event::GovernanceEvent;

pub struct VoterBodyScheduler<'a> {
    params: &'a GovernanceParams,
}

impl<'a> VoterBodyScheduler<'a> {
    pub fn new(params: &'a GovernanceParams) -> Self {
        Self { params }
    }

    pub fn schedule(
        &self,
        epoch: &mut Epoch,
        total_supply: u128,
        now: Timestamp,
    ) -> Result<Vec<GovernanceEvent>, GovernanceError> {
        if let Some(existing) = epoch.voter_body_schedule {
            return Err(GovernanceError::UpgradeAlreadyScheduled {
                implementation: existing.implementation,
                end_time: existing.end_time,
            });
        }
        let qualification = epoch.qualification(self.params, total_supply);
        let implementation = match qualification.implementation {
            Some(imp) if qualification.is_met() => imp,
            _ => return Err(qualification.not_reached()),
        };
        let end_time = now.saturating_add_secs(self.params.delay_duration_secs);

        epoch.voter_body_schedule = Some(ScheduledUpgrade {
            implementation,
            end_time,
        });
        let vetoed = epoch.council_schedule.take();

        Ok(vec![
            GovernanceEvent::VoterBodyUpgradeScheduled {
                epoch: epoch.id,
                implementation,
                end_time,
            },
            GovernanceEvent::CouncilUpgradeVetoed {
                epoch: epoch.id,
                implementation: vetoed.map(|s| s.implementation),
            },
        ])
    }

    /// Drop a schedule whose implementation has lost its qualifying status.
    ///
    /// Only possible after the delay window; a schedule that still qualifies
    /// cannot be withdrawn.
    pub fn cancel(
        &self,
        epoch: &mut Epoch,
        total_supply: u128,
        now: Timestamp,
    ) -> Result<GovernanceEvent, GovernanceError> {
        let scheduled = epoch
            .voter_body_schedule
            .ok_or(GovernanceError::UpgradeNotScheduled)?;
        ensure_delay_elapsed(Some(&scheduled), now)?;

        let qualification = epoch.qualification(self.params, total_supply);
        let still_qualifies = qualification.implementation == Some(scheduled.implementation)
            && qualification.is_met();
        if still_qualifies {
            return Err(GovernanceError::UpgradeCancellationInvalid {
                implementation: scheduled.implementation,
            });
        }

        epoch.voter_body_schedule = None;
        Ok(GovernanceEvent::VoterBodyUpgradeCancelled {
            epoch: epoch.id,
            implementation: scheduled.implementation,
        })
    }
}
