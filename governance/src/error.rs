use thiserror::Error;
use upgov_types::{Address, Timestamp};

/// Coarse class of a [`GovernanceError`], for callers that branch on category
/// rather than on the exact variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong caller for a council-only operation.
    Authorization,
    /// Balance, vote or argument preconditions.
    Precondition,
    /// Quorum / minimum locked supply / most-voted / track precedence.
    GovernanceGate,
    /// Already scheduled, nothing scheduled, cancellation not valid.
    SchedulingState,
    /// Delay window not started or not ended.
    Timing,
    /// Invalid governance parameters at construction or restore.
    Configuration,
    Arithmetic,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("caller {caller} is not the council ({council})")]
    UnauthorizedCaller { caller: Address, council: Address },

    #[error("insufficient unlocked balance for {account}: have {unlocked}, need {needed}")]
    InsufficientUnlockedBalance {
        account: Address,
        unlocked: u128,
        needed: u128,
    },

    #[error("insufficient locked balance for {voter}: locked {locked} does not exceed current votum {votum}")]
    InsufficientLockedBalance {
        voter: Address,
        locked: u128,
        votum: u128,
    },

    #[error("{voter} has no votes to revoke on {implementation}")]
    NoVotesToRevoke { voter: Address, implementation: Address },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("implementation is the zero address")]
    ImplementationZero,

    #[error("invalid council address: {0}")]
    InvalidCouncil(Address),

    #[error(
        "quorum or minimum locked supply not reached for {implementation:?}: \
         votes {total_votes} (need > {quorum_threshold}), locked supply {locked_supply} (need >= {min_locked_supply})"
    )]
    QuorumOrMinLockedSupplyNotReached {
        implementation: Option<Address>,
        total_votes: u128,
        quorum_threshold: u128,
        locked_supply: u128,
        min_locked_supply: u128,
    },

    #[error(
        "voter body already reached quorum and minimum locked supply for {implementation:?}: \
         votes {total_votes} > {quorum_threshold}, locked supply {locked_supply} >= {min_locked_supply}"
    )]
    QuorumAndMinLockedSupplyReached {
        implementation: Option<Address>,
        total_votes: u128,
        quorum_threshold: u128,
        locked_supply: u128,
        min_locked_supply: u128,
    },

    #[error("{candidate} is not the most voted implementation (most voted: {most_voted:?})")]
    ImplementationNotMostVoted {
        candidate: Address,
        most_voted: Option<Address>,
    },

    #[error("upgrade to {implementation} already scheduled until {end_time}")]
    UpgradeAlreadyScheduled {
        implementation: Address,
        end_time: Timestamp,
    },

    #[error("no upgrade scheduled")]
    UpgradeNotScheduled,

    #[error("scheduled upgrade to {implementation} still qualifies and cannot be cancelled")]
    UpgradeCancellationInvalid { implementation: Address },

    #[error("{implementation} is scheduled on both the voter-body and council tracks")]
    ConflictingSchedules { implementation: Address },

    #[error("delay period not started")]
    DelayPeriodNotStarted,

    #[error("delay period not ended: ends at {end_time}, now {now}")]
    DelayPeriodNotEnded { end_time: Timestamp, now: Timestamp },

    #[error("invalid governance parameters: {0}")]
    InvalidParams(String),

    #[error("arithmetic overflow in governance accounting")]
    Overflow,
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnauthorizedCaller { .. } => ErrorKind::Authorization,
            Self::InsufficientUnlockedBalance { .. }
            | Self::InsufficientLockedBalance { .. }
            | Self::NoVotesToRevoke { .. }
            | Self::ZeroAmount
            | Self::ImplementationZero
            | Self::InvalidCouncil(_) => ErrorKind::Precondition,
            Self::QuorumOrMinLockedSupplyNotReached { .. }
            | Self::QuorumAndMinLockedSupplyReached { .. }
            | Self::ImplementationNotMostVoted { .. } => ErrorKind::GovernanceGate,
            Self::UpgradeAlreadyScheduled { .. }
            | Self::UpgradeNotScheduled
            | Self::UpgradeCancellationInvalid { .. }
            | Self::ConflictingSchedules { .. } => ErrorKind::SchedulingState,
            Self::DelayPeriodNotStarted | Self::DelayPeriodNotEnded { .. } => ErrorKind::Timing,
            Self::InvalidParams(_) => ErrorKind::Configuration,
            Self::Overflow => ErrorKind::Arithmetic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let caller = Address::from_index(1);
        assert_eq!(
            GovernanceError::UnauthorizedCaller {
                caller,
                council: Address::from_index(2)
            }
            .kind(),
            ErrorKind::Authorization
        );
        assert_eq!(GovernanceError::UpgradeNotScheduled.kind(), ErrorKind::SchedulingState);
        assert_eq!(GovernanceError::DelayPeriodNotStarted.kind(), ErrorKind::Timing);
        assert_eq!(
            GovernanceError::InvalidParams("quorum_bps 20000 exceeds 10000".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(GovernanceError::Overflow.kind(), ErrorKind::Arithmetic);
        assert_eq!(
            GovernanceError::ImplementationNotMostVoted {
                candidate: caller,
                most_voted: None
            }
            .kind(),
            ErrorKind::GovernanceGate
        );
    }

    #[test]
    fn messages_carry_values() {
        let err = GovernanceError::DelayPeriodNotEnded {
            end_time: Timestamp::new(200),
            now: Timestamp::new(150),
        };
        assert_eq!(err.to_string(), "delay period not ended: ends at 200s, now 150s");
    }
}
