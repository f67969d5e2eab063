//! Fungible token ledger.
//!
//! Tracks balances, allowances and total supply. Every balance decrease goes
//! through a [`BalanceGuard`] supplied by the caller, which is how governance
//! keeps locked balance from leaving an account. Minting (source =
//! [`Address::ZERO`](upgov_types::Address::ZERO)) never consults the guard.

pub mod error;
pub mod genesis;
pub mod ledger;
pub mod snapshot;

pub use error::LedgerError;
pub use genesis::GenesisAllocation;
pub use ledger::{Approval, BalanceGuard, NoGuard, TokenLedger, Transfer};
pub use snapshot::{AccountSnapshot, AllowanceSnapshot, LedgerSnapshot};
