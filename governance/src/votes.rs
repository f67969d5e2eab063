//! VoteTracker: per-voter votum per implementation, ballot totals, and the
//! single most-voted pointer.
//!
//! Only the leader is tracked, an O(1) update per vote. A fully ranked list
//! would cost O(k) per vote in the number of proposed implementations, and
//! anyone can inflate k by voting dust on fresh addresses.

use upgov_types::Address;

use crate::epoch::Epoch;
use crate::error::GovernanceError;
use crate::event::GovernanceEvent;

#[derive(Clone, Copy, Debug, Default)]
pub struct VoteTracker;

impl VoteTracker {
    /// Set `voter`'s votum on `implementation` to its full locked balance.
    ///
    /// A vote may only raise the votum; re-casting without locking more fails.
    /// Ties with the current leader do not move the most-voted pointer.
    pub fn cast_vote(
        &self,
        epoch: &mut Epoch,
        voter: &Address,
        implementation: &Address,
    ) -> Result<Vec<GovernanceEvent>, GovernanceError> {
        if implementation.is_zero() {
            return Err(GovernanceError::ImplementationZero);
        }
        let new_votum = epoch.locked_balance(voter);
        let old_votum = epoch.votum(voter, implementation);
        if new_votum <= old_votum {
            return Err(GovernanceError::InsufficientLockedBalance {
                voter: *voter,
                locked: new_votum,
                votum: old_votum,
            });
        }
        let delta = new_votum - old_votum;
        let total_votes = epoch
            .total_votes(implementation)
            .checked_add(delta)
            .ok_or(GovernanceError::Overflow)?;

        let ballot = epoch.ballots.entry(*implementation).or_default();
        ballot.total_votes = total_votes;
        ballot.votes.insert(*voter, new_votum);

        let mut events = vec![GovernanceEvent::VoteCast {
            epoch: epoch.id,
            voter: *voter,
            implementation: *implementation,
            votum: new_votum,
            total_votes,
        }];

        let previous = epoch.most_voted;
        let leader_votes = match previous {
            Some(leader) if leader == *implementation => None,
            Some(leader) => Some(epoch.total_votes(&leader)),
            None => Some(0),
        };
        if let Some(leader_votes) = leader_votes {
            if total_votes > leader_votes {
                epoch.most_voted = Some(*implementation);
                events.push(GovernanceEvent::MostVotedChanged {
                    epoch: epoch.id,
                    previous,
                    implementation: *implementation,
                    total_votes,
                });
            }
        }

        Ok(events)
    }

    /// Zero `voter`'s votum on `implementation`.
    ///
    /// The most-voted pointer is left as is, even if it now points at a ballot
    /// that lost its lead; it moves again on the next vote that overtakes it.
    pub fn revoke_vote(
        &self,
        epoch: &mut Epoch,
        voter: &Address,
        implementation: &Address,
    ) -> Result<GovernanceEvent, GovernanceError> {
        let no_votes = || GovernanceError::NoVotesToRevoke {
            voter: *voter,
            implementation: *implementation,
        };
        let ballot = epoch.ballots.get_mut(implementation).ok_or_else(no_votes)?;
        let revoked = ballot.votum(voter);
        if revoked == 0 {
            return Err(no_votes());
        }
        let total_votes = ballot
            .total_votes
            .checked_sub(revoked)
            .ok_or(GovernanceError::Overflow)?;
        ballot.total_votes = total_votes;
        ballot.votes.remove(voter);

        Ok(GovernanceEvent::VoteRevoked {
            epoch: epoch.id,
            voter: *voter,
            implementation: *implementation,
            revoked,
            total_votes,
        })
    }
}
