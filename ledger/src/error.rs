use thiserror::Error;
use upgov_types::Address;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance for {account}: have {balance}, need {needed}")]
    InsufficientBalance {
        account: Address,
        balance: u128,
        needed: u128,
    },

    #[error("insufficient unlocked balance for {account}: have {unlocked}, need {needed}")]
    InsufficientUnlockedBalance {
        account: Address,
        unlocked: u128,
        needed: u128,
    },

    #[error("insufficient allowance for {spender} on {owner}: have {allowance}, need {needed}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        allowance: u128,
        needed: u128,
    },

    #[error("invalid sender: {0}")]
    InvalidSender(Address),

    #[error("invalid receiver: {0}")]
    InvalidReceiver(Address),

    #[error("invalid approver: {0}")]
    InvalidApprover(Address),

    #[error("invalid spender: {0}")]
    InvalidSpender(Address),

    #[error("balance decrease rejected: {0}")]
    Rejected(String),

    #[error("arithmetic overflow in ledger update")]
    Overflow,

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
