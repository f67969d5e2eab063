//! In-memory token ledger with a pluggable pre-decrease guard.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use upgov_types::Address;

use crate::error::LedgerError;

/// Hook consulted before any account balance goes down.
///
/// `balance` is the account's full balance before the decrease. Implementors
/// reject the decrease by returning an error; the ledger then leaves every
/// balance, allowance and the supply untouched.
pub trait BalanceGuard {
    fn before_decrease(&self, from: &Address, balance: u128, value: u128) -> Result<(), LedgerError>;
}

/// A guard that allows everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGuard;

impl BalanceGuard for NoGuard {
    fn before_decrease(&self, _from: &Address, _balance: u128, _value: u128) -> Result<(), LedgerError> {
        Ok(())
    }
}

/// A completed balance movement. `from == ZERO` is a mint, `to == ZERO` a burn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub value: u128,
}

/// A completed allowance change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub owner: Address,
    pub spender: Address,
    pub value: u128,
}

/// Balances, allowances and total supply.
#[derive(Clone, Debug, Default)]
pub struct TokenLedger {
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
    total_supply: u128,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Iterate over all accounts with a non-zero balance.
    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &u128)> {
        self.balances.iter().filter(|(_, b)| **b > 0)
    }

    pub(crate) fn allowance_entries(&self) -> impl Iterator<Item = (&(Address, Address), &u128)> {
        self.allowances.iter().filter(|(_, v)| **v > 0)
    }

    /// Issue new balance to `to`. Never consults the guard.
    pub fn mint(&mut self, to: &Address, value: u128) -> Result<Transfer, LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::InvalidReceiver(*to));
        }
        self.update(&Address::ZERO, to, value, &NoGuard)
    }

    /// Destroy `value` of `from`'s balance.
    pub fn burn(
        &mut self,
        from: &Address,
        value: u128,
        guard: &dyn BalanceGuard,
    ) -> Result<Transfer, LedgerError> {
        if from.is_zero() {
            return Err(LedgerError::InvalidSender(*from));
        }
        self.update(from, &Address::ZERO, value, guard)
    }

    /// Move `value` from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        value: u128,
        guard: &dyn BalanceGuard,
    ) -> Result<Transfer, LedgerError> {
        if from.is_zero() {
            return Err(LedgerError::InvalidSender(*from));
        }
        if to.is_zero() {
            return Err(LedgerError::InvalidReceiver(*to));
        }
        self.update(from, to, value, guard)
    }

    /// Set `spender`'s allowance over `owner`'s balance.
    pub fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        value: u128,
    ) -> Result<Approval, LedgerError> {
        if owner.is_zero() {
            return Err(LedgerError::InvalidApprover(*owner));
        }
        if spender.is_zero() {
            return Err(LedgerError::InvalidSpender(*spender));
        }
        self.allowances.insert((*owner, *spender), value);
        Ok(Approval {
            owner: *owner,
            spender: *spender,
            value,
        })
    }

    /// Move `value` from `from` to `to` on behalf of `spender`, consuming allowance.
    ///
    /// An allowance of `u128::MAX` is treated as unlimited and not decremented.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        value: u128,
        guard: &dyn BalanceGuard,
    ) -> Result<Transfer, LedgerError> {
        let allowance = self.allowance(from, spender);
        if allowance < value {
            return Err(LedgerError::InsufficientAllowance {
                owner: *from,
                spender: *spender,
                allowance,
                needed: value,
            });
        }
        let transfer = self.transfer(from, to, value, guard)?;
        if allowance != u128::MAX {
            self.allowances.insert((*from, *spender), allowance - value);
        }
        Ok(transfer)
    }

    /// Shared balance movement. Validates everything before touching state.
    fn update(
        &mut self,
        from: &Address,
        to: &Address,
        value: u128,
        guard: &dyn BalanceGuard,
    ) -> Result<Transfer, LedgerError> {
        let mut supply = self.total_supply;

        let from_after = if from.is_zero() {
            supply = supply.checked_add(value).ok_or(LedgerError::Overflow)?;
            None
        } else {
            let balance = self.balance_of(from);
            guard.before_decrease(from, balance, value)?;
            if balance < value {
                return Err(LedgerError::InsufficientBalance {
                    account: *from,
                    balance,
                    needed: value,
                });
            }
            Some(balance - value)
        };

        let to_after = if to.is_zero() {
            supply = supply.checked_sub(value).ok_or(LedgerError::Overflow)?;
            None
        } else {
            // A self-transfer reads the already-debited balance.
            let base = match from_after {
                Some(after) if from == to => after,
                _ => self.balance_of(to),
            };
            Some(base.checked_add(value).ok_or(LedgerError::Overflow)?)
        };

        if let Some(after) = from_after {
            self.balances.insert(*from, after);
        }
        if let Some(after) = to_after {
            self.balances.insert(*to, after);
        }
        self.total_supply = supply;

        Ok(Transfer {
            from: *from,
            to: *to,
            value,
        })
    }

    pub(crate) fn restore(
        balances: HashMap<Address, u128>,
        allowances: HashMap<(Address, Address), u128>,
        total_supply: u128,
    ) -> Self {
        Self {
            balances,
            allowances,
            total_supply,
        }
    }
}
