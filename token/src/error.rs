use thiserror::Error;
use upgov_governance::GovernanceError;
use upgov_ledger::LedgerError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),

    #[error("governance: {0}")]
    Governance(#[from] GovernanceError),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
