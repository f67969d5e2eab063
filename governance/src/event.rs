//! Notifications emitted on every successful governance transition.

use serde::{Deserialize, Serialize};
use upgov_types::{Address, EpochId, Timestamp};

/// Governance-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    /// Balance was locked for voting.
    Locked {
        epoch: EpochId,
        account: Address,
        value: u128,
        locked: u128,
        locked_supply: u128,
    },
    /// A voter raised its votum on an implementation.
    VoteCast {
        epoch: EpochId,
        voter: Address,
        implementation: Address,
        votum: u128,
        total_votes: u128,
    },
    /// A voter withdrew its votum from an implementation.
    VoteRevoked {
        epoch: EpochId,
        voter: Address,
        implementation: Address,
        revoked: u128,
        total_votes: u128,
    },
    /// The most-voted pointer moved.
    MostVotedChanged {
        epoch: EpochId,
        previous: Option<Address>,
        implementation: Address,
        total_votes: u128,
    },
    VoterBodyUpgradeScheduled {
        epoch: EpochId,
        implementation: Address,
        end_time: Timestamp,
    },
    VoterBodyUpgradeCancelled {
        epoch: EpochId,
        implementation: Address,
    },
    CouncilUpgradeScheduled {
        epoch: EpochId,
        implementation: Address,
        end_time: Timestamp,
    },
    CouncilUpgradeCancelled {
        epoch: EpochId,
        implementation: Address,
    },
    /// The voter body cleared the council track. `implementation` is whatever
    /// was pending at the time, if anything.
    CouncilUpgradeVetoed {
        epoch: EpochId,
        implementation: Option<Address>,
    },
    CouncilTransferred {
        epoch: EpochId,
        previous: Address,
        council: Address,
    },
    /// An upgrade executed and a fresh epoch began.
    EpochAdvanced { previous: EpochId, epoch: EpochId },
}

impl GovernanceEvent {
    /// Write the event to the tracing subscriber.
    pub(crate) fn trace(&self) {
        match self {
            Self::Locked { epoch, account, value, locked, locked_supply } => {
                tracing::info!(%epoch, %account, value, locked, locked_supply, "balance locked");
            }
            Self::VoteCast { epoch, voter, implementation, votum, total_votes } => {
                tracing::info!(%epoch, %voter, %implementation, votum, total_votes, "vote cast");
            }
            Self::VoteRevoked { epoch, voter, implementation, revoked, total_votes } => {
                tracing::info!(%epoch, %voter, %implementation, revoked, total_votes, "vote revoked");
            }
            Self::MostVotedChanged { epoch, previous, implementation, total_votes } => {
                tracing::info!(%epoch, ?previous, %implementation, total_votes, "most voted implementation changed");
            }
            Self::VoterBodyUpgradeScheduled { epoch, implementation, end_time } => {
                tracing::info!(%epoch, %implementation, %end_time, "voter body upgrade scheduled");
            }
            Self::VoterBodyUpgradeCancelled { epoch, implementation } => {
                tracing::info!(%epoch, %implementation, "voter body upgrade cancelled");
            }
            Self::CouncilUpgradeScheduled { epoch, implementation, end_time } => {
                tracing::info!(%epoch, %implementation, %end_time, "council upgrade scheduled");
            }
            Self::CouncilUpgradeCancelled { epoch, implementation } => {
                tracing::info!(%epoch, %implementation, "council upgrade cancelled");
            }
            Self::CouncilUpgradeVetoed { epoch, implementation } => {
                tracing::info!(%epoch, ?implementation, "council upgrade vetoed");
            }
            Self::CouncilTransferred { epoch, previous, council } => {
                tracing::info!(%epoch, %previous, %council, "council transferred");
            }
            Self::EpochAdvanced { previous, epoch } => {
                tracing::info!(%previous, %epoch, "governance epoch advanced");
            }
        }
    }
}

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline on the emitting thread after the state change
/// has been committed; keep handlers fast.
pub struct EventBus<E> {
    listeners: Vec<Box<dyn Fn(&E) + Send + Sync>>,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&E) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
