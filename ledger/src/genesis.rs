//! Genesis allocations: the initial distribution minted when a token is created.

use serde::{Deserialize, Serialize};

use upgov_types::Address;

use crate::error::LedgerError;
use crate::ledger::TokenLedger;

/// One initial balance minted at token creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAllocation {
    pub account: Address,
    pub amount: u128,
}

impl TokenLedger {
    /// Build a ledger by minting every allocation in order.
    ///
    /// Allocations to the same account accumulate.
    pub fn from_genesis(allocations: &[GenesisAllocation]) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        for alloc in allocations {
            ledger.mint(&alloc.account, alloc.amount)?;
        }
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_accumulate() {
        let a = Address::from_index(1);
        let b = Address::from_index(2);
        let ledger = TokenLedger::from_genesis(&[
            GenesisAllocation { account: a, amount: 10 },
            GenesisAllocation { account: b, amount: 5 },
            GenesisAllocation { account: a, amount: 1 },
        ])
        .unwrap();
        assert_eq!(ledger.balance_of(&a), 11);
        assert_eq!(ledger.total_supply(), 16);
    }

    #[test]
    fn zero_account_is_rejected() {
        let res = TokenLedger::from_genesis(&[GenesisAllocation {
            account: Address::ZERO,
            amount: 1,
        }]);
        assert!(matches!(res, Err(LedgerError::InvalidReceiver(_))));
    }
}
