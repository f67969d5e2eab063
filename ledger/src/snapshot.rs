//! Ledger snapshots: capture every balance and allowance at a point in time.
//!
//! Entries are sorted by address so the snapshot hash is deterministic and a
//! restored ledger can be checked against the hash it was exported with.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use upgov_types::Address;

use crate::error::LedgerError;
use crate::ledger::TokenLedger;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 of the entries and supply.
    pub hash: [u8; 32],
    pub total_supply: u128,
    pub accounts: Vec<AccountSnapshot>,
    pub allowances: Vec<AllowanceSnapshot>,
    /// Snapshot version for compatibility.
    pub version: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub address: Address,
    pub balance: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceSnapshot {
    pub owner: Address,
    pub spender: Address,
    pub value: u128,
}

impl LedgerSnapshot {
    pub const VERSION: u32 = 1;

    /// Capture the current state of `ledger`.
    pub fn capture(ledger: &TokenLedger) -> Self {
        let mut accounts: Vec<AccountSnapshot> = ledger
            .accounts()
            .map(|(address, balance)| AccountSnapshot {
                address: *address,
                balance: *balance,
            })
            .collect();
        accounts.sort_by_key(|a| a.address);

        let mut allowances: Vec<AllowanceSnapshot> = ledger
            .allowance_entries()
            .map(|((owner, spender), value)| AllowanceSnapshot {
                owner: *owner,
                spender: *spender,
                value: *value,
            })
            .collect();
        allowances.sort_by_key(|a| (a.owner, a.spender));

        let mut snap = Self {
            hash: [0u8; 32],
            total_supply: ledger.total_supply(),
            accounts,
            allowances,
            version: Self::VERSION,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        for account in &self.accounts {
            hasher.update(account.address.as_bytes());
            hasher.update(account.balance.to_le_bytes());
        }
        for allowance in &self.allowances {
            hasher.update(allowance.owner.as_bytes());
            hasher.update(allowance.spender.as_bytes());
            hasher.update(allowance.value.to_le_bytes());
        }
        hasher.update(self.total_supply.to_le_bytes());
        hasher.update(self.version.to_le_bytes());

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the hash matches the content and balances sum to the supply.
    pub fn verify(&self) -> bool {
        let sum = self
            .accounts
            .iter()
            .try_fold(0u128, |acc, a| acc.checked_add(a.balance));
        self.hash == self.compute_hash() && sum == Some(self.total_supply)
    }

    /// Rebuild a ledger, refusing snapshots that fail [`verify`](Self::verify).
    pub fn restore(&self) -> Result<TokenLedger, LedgerError> {
        if !self.verify() {
            return Err(LedgerError::Snapshot("snapshot hash or supply mismatch".into()));
        }
        let balances: HashMap<Address, u128> = self
            .accounts
            .iter()
            .map(|a| (a.address, a.balance))
            .collect();
        let allowances: HashMap<(Address, Address), u128> = self
            .allowances
            .iter()
            .map(|a| ((a.owner, a.spender), a.value))
            .collect();
        Ok(TokenLedger::restore(balances, allowances, self.total_supply))
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("snapshot serialization should not fail")
    }

    /// Deserialize a snapshot from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::Snapshot(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::NoGuard;

    fn sample_ledger() -> TokenLedger {
        let mut ledger = TokenLedger::new();
        ledger.mint(&Address::from_index(1), 100).unwrap();
        ledger.mint(&Address::from_index(2), 50).unwrap();
        ledger
            .transfer(&Address::from_index(1), &Address::from_index(3), 25, &NoGuard)
            .unwrap();
        ledger
            .approve(&Address::from_index(2), &Address::from_index(1), 7)
            .unwrap();
        ledger
    }

    #[test]
    fn capture_and_verify() {
        let snap = LedgerSnapshot::capture(&sample_ledger());
        assert!(snap.verify());
        assert_eq!(snap.accounts.len(), 3);
        assert_eq!(snap.allowances.len(), 1);
        assert_eq!(snap.total_supply, 150);
    }

    #[test]
    fn tampered_snapshot_fails_verify() {
        let mut snap = LedgerSnapshot::capture(&sample_ledger());
        snap.accounts[0].balance += 1;
        assert!(!snap.verify());
        assert!(matches!(snap.restore(), Err(LedgerError::Snapshot(_))));
    }

    #[test]
    fn bytes_roundtrip_restores_ledger() {
        let ledger = sample_ledger();
        let snap = LedgerSnapshot::capture(&ledger);
        let restored = LedgerSnapshot::from_bytes(&snap.to_bytes())
            .unwrap()
            .restore()
            .unwrap();
        assert_eq!(restored.balance_of(&Address::from_index(3)), 25);
        assert_eq!(
            restored.allowance(&Address::from_index(2), &Address::from_index(1)),
            7
        );
        assert_eq!(restored.total_supply(), ledger.total_supply());
    }

    #[test]
    fn hash_is_independent_of_insertion_order() {
        let mut a = TokenLedger::new();
        a.mint(&Address::from_index(1), 1).unwrap();
        a.mint(&Address::from_index(2), 2).unwrap();
        let mut b = TokenLedger::new();
        b.mint(&Address::from_index(2), 2).unwrap();
        b.mint(&Address::from_index(1), 1).unwrap();
        assert_eq!(
            LedgerSnapshot::capture(&a).hash,
            LedgerSnapshot::capture(&b).hash
        );
    }
}
