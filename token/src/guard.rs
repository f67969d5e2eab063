//! The bridge from ledger to governance: a [`BalanceGuard`] that refuses to
//! move locked balance.

use upgov_governance::{GovernanceEngine, GovernanceError};
use upgov_ledger::{BalanceGuard, LedgerError};
use upgov_types::Address;

pub struct LockGuard<'a> {
    governance: &'a GovernanceEngine,
}

impl<'a> LockGuard<'a> {
    pub fn new(governance: &'a GovernanceEngine) -> Self {
        Self { governance }
    }
}

impl BalanceGuard for LockGuard<'_> {
    fn before_decrease(&self, from: &Address, balance: u128, value: u128) -> Result<(), LedgerError> {
        self.governance
            .check_decrease(from, balance, value)
            .map_err(|e| match e {
                GovernanceError::InsufficientUnlockedBalance {
                    account,
                    unlocked,
                    needed,
                } => LedgerError::InsufficientUnlockedBalance {
                    account,
                    unlocked,
                    needed,
                },
                other => LedgerError::Rejected(other.to_string()),
            })
    }
}
