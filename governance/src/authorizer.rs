//! UpgradeAuthorizer: the last gate before an implementation switch.
//!
//! Everything that held at scheduling time is checked again here, since votes
//! and locks may have moved during the delay window.

use serde::{Deserialize, Serialize};
use upgov_types::{Address, GovernanceParams, Timestamp};

use crate::epoch::{ensure_delay_elapsed, Epoch};
use crate::error::GovernanceError;

/// Which track authorised an upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeTrack {
    VoterBody,
    Council,
}

pub struct UpgradeAuthorizer<'a> {
    params: &'a GovernanceParams,
}

impl<'a> UpgradeAuthorizer<'a> {
    pub fn new(params: &'a GovernanceParams) -> Self {
        Self { params }
    }

    pub fn authorize(
        &self,
        epoch: &Epoch,
        candidate: &Address,
        total_supply: u128,
        now: Timestamp,
    ) -> Result<UpgradeTrack, GovernanceError> {
        if candidate.is_zero() {
            return Err(GovernanceError::ImplementationZero);
        }
        let voter_body = epoch
            .voter_body_schedule
            .filter(|s| s.implementation == *candidate);
        let council = epoch
            .council_schedule
            .filter(|s| s.implementation == *candidate);
        let qualification = epoch.qualification(self.params, total_supply);

        match (voter_body, council) {
            (Some(_), Some(_)) => Err(GovernanceError::ConflictingSchedules {
                implementation: *candidate,
            }),
            (Some(schedule), None) => {
                if qualification.implementation != Some(*candidate) {
                    return Err(GovernanceError::ImplementationNotMostVoted {
                        candidate: *candidate,
                        most_voted: qualification.implementation,
                    });
                }
                if !qualification.is_met() {
                    return Err(qualification.not_reached());
                }
                ensure_delay_elapsed(Some(&schedule), now)?;
                Ok(UpgradeTrack::VoterBody)
            }
            (None, Some(schedule)) => {
                if qualification.is_met() {
                    return Err(qualification.reached());
                }
                ensure_delay_elapsed(Some(&schedule), now)?;
                Ok(UpgradeTrack::Council)
            }
            (None, None) => Err(GovernanceError::UpgradeNotScheduled),
        }
    }
}
