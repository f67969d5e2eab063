//! LockLedger: per-account locked balance and the epoch's locked supply.
//!
//! Locking is one-way for the life of an epoch. Balance becomes spendable again
//! only when an upgrade executes and a fresh epoch starts with nothing locked.

use upgov_types::Address;

use crate::epoch::Epoch;
use crate::error::GovernanceError;
use crate::event::GovernanceEvent;

#[derive(Clone, Copy, Debug, Default)]
pub struct LockLedger;

impl LockLedger {
    /// `balance - locked`, never underflowing.
    pub fn unlocked_balance(&self, epoch: &Epoch, account: &Address, balance: u128) -> u128 {
        balance.saturating_sub(epoch.locked_balance(account))
    }

    /// Lock `value` of `account`'s currently unlocked `balance`.
    pub fn lock(
        &self,
        epoch: &mut Epoch,
        account: &Address,
        value: u128,
        balance: u128,
    ) -> Result<GovernanceEvent, GovernanceError> {
        if value == 0 {
            return Err(GovernanceError::ZeroAmount);
        }
        let locked = epoch.locked_balance(account);
        let unlocked = balance.saturating_sub(locked);
        if value > unlocked {
            return Err(GovernanceError::InsufficientUnlockedBalance {
                account: *account,
                unlocked,
                needed: value,
            });
        }
        let locked = locked.checked_add(value).ok_or(GovernanceError::Overflow)?;
        let locked_supply = epoch
            .locked_supply
            .checked_add(value)
            .ok_or(GovernanceError::Overflow)?;

        epoch.locked.insert(*account, locked);
        epoch.locked_supply = locked_supply;

        Ok(GovernanceEvent::Locked {
            epoch: epoch.id,
            account: *account,
            value,
            locked,
            locked_supply,
        })
    }

    /// Guard for every balance decrease on the ledger.
    ///
    /// The zero address is the mint sentinel: issuance is unlocked by
    /// construction and always passes.
    pub fn check_decrease(
        &self,
        epoch: &Epoch,
        account: &Address,
        balance: u128,
        value: u128,
    ) -> Result<(), GovernanceError> {
        if account.is_zero() {
            return Ok(());
        }
        let unlocked = self.unlocked_balance(epoch, account, balance);
        if unlocked < value {
            return Err(GovernanceError::InsufficientUnlockedBalance {
                account: *account,
                unlocked,
                needed: value,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upgov_types::EpochId;

    fn epoch() -> Epoch {
        Epoch::new(EpochId::GENESIS, Address::from_index(99))
    }

    #[test]
    fn lock_updates_account_and_supply() {
        let mut epoch = epoch();
        let a = Address::from_index(1);
        let event = LockLedger.lock(&mut epoch, &a, 40, 100).unwrap();
        assert_eq!(
            event,
            GovernanceEvent::Locked {
                epoch: EpochId::GENESIS,
                account: a,
                value: 40,
                locked: 40,
                locked_supply: 40
            }
        );
        LockLedger.lock(&mut epoch, &a, 60, 100).unwrap();
        assert_eq!(epoch.locked_balance(&a), 100);
        assert_eq!(epoch.locked_supply(), 100);
        assert_eq!(LockLedger.unlocked_balance(&epoch, &a, 100), 0);
    }

    #[test]
    fn lock_beyond_unlocked_fails_without_mutation() {
        let mut epoch = epoch();
        let a = Address::from_index(1);
        LockLedger.lock(&mut epoch, &a, 70, 100).unwrap();
        let err = LockLedger.lock(&mut epoch, &a, 31, 100).unwrap_err();
        assert_eq!(
            err,
            GovernanceError::InsufficientUnlockedBalance {
                account: a,
                unlocked: 30,
                needed: 31
            }
        );
        assert_eq!(epoch.locked_balance(&a), 70);
        assert_eq!(epoch.locked_supply(), 70);
    }

    #[test]
    fn zero_lock_rejected() {
        let mut epoch = epoch();
        assert_eq!(
            LockLedger.lock(&mut epoch, &Address::from_index(1), 0, 10),
            Err(GovernanceError::ZeroAmount)
        );
    }

    #[test]
    fn check_decrease_respects_locked_and_mint_sentinel() {
        let mut epoch = epoch();
        let a = Address::from_index(1);
        LockLedger.lock(&mut epoch, &a, 60, 100).unwrap();
        assert!(LockLedger.check_decrease(&epoch, &a, 100, 40).is_ok());
        assert!(matches!(
            LockLedger.check_decrease(&epoch, &a, 100, 41),
            Err(GovernanceError::InsufficientUnlockedBalance { unlocked: 40, needed: 41, .. })
        ));
        assert!(LockLedger
            .check_decrease(&epoch, &Address::ZERO, 0, u128::MAX)
            .is_ok());
    }
}
