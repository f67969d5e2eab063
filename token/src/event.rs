use serde::{Deserialize, Serialize};
use upgov_governance::UpgradeTrack;
use upgov_ledger::{Approval, Transfer};
use upgov_types::{Address, EpochId};

/// Token-level notifications. Governance transitions are published on the
/// governance engine's own bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    Transfer(Transfer),
    Approval(Approval),
    /// The proxy switched implementation and a new epoch began.
    Upgraded {
        previous: Address,
        implementation: Address,
        track: UpgradeTrack,
        epoch: EpochId,
    },
}
