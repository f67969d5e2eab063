//! Whole-token snapshots: ledger, current governance epoch and proxy slot.
//!
//! Finished epochs are not captured; they are inert once an upgrade executes.

use serde::{Deserialize, Serialize};
use upgov_governance::{Epoch, GovernanceEngine};
use upgov_ledger::{LedgerSnapshot, TokenLedger};
use upgov_types::{Address, Clock, EpochId, GovernanceParams};

use crate::error::TokenError;
use crate::token::UpgradeableToken;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub ledger: LedgerSnapshot,
    pub params: GovernanceParams,
    pub epoch: Epoch,
    pub implementation: Address,
    pub history: Vec<(EpochId, Address)>,
}

impl TokenSnapshot {
    pub fn capture<C: Clock>(token: &UpgradeableToken<C>) -> Self {
        Self {
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            decimals: token.decimals,
            ledger: LedgerSnapshot::capture(&token.ledger),
            params: token.governance.params().clone(),
            epoch: token.governance.current().clone(),
            implementation: token.implementation,
            history: token.history.clone(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TokenError> {
        bincode::serialize(self).map_err(|e| TokenError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        bincode::deserialize(bytes).map_err(|e| TokenError::Snapshot(e.to_string()))
    }

    /// Rebuild a token, rejecting snapshots whose ledger and locks disagree.
    pub fn restore<C: Clock>(&self, clock: C) -> Result<UpgradeableToken<C>, TokenError> {
        let ledger = self.ledger.restore()?;

        check_epoch(&self.epoch, &ledger)?;
        if self.history.last().map(|(_, imp)| *imp) != Some(self.implementation) {
            return Err(TokenError::Snapshot("implementation history does not end at the active implementation".into()));
        }

        let governance = GovernanceEngine::restore(self.params.clone(), self.epoch.clone())?;
        tracing::info!(
            epoch = %self.epoch.id(),
            implementation = %self.implementation,
            "token restored from snapshot"
        );
        Ok(UpgradeableToken::from_parts(
            self.name.clone(),
            self.symbol.clone(),
            self.decimals,
            ledger,
            governance,
            self.implementation,
            self.history.clone(),
            clock,
        ))
    }
}

/// The lock and ballot invariants must hold against the restored balances.
fn check_epoch(epoch: &Epoch, ledger: &TokenLedger) -> Result<(), TokenError> {
    let invalid = |msg: String| Err(TokenError::Snapshot(msg));

    for (account, locked) in epoch.locked_accounts() {
        let balance = ledger.balance_of(account);
        if locked > balance {
            return invalid(format!("{account} has {locked} locked but a balance of {balance}"));
        }
    }
    // Bounded by total supply after the per-account check.
    if epoch.sum_of_locked() != epoch.locked_supply() {
        return invalid("locked supply does not match locked balances".into());
    }
    for (implementation, ballot) in epoch.ballots() {
        let mut sum = 0u128;
        for (voter, votum) in ballot.voters() {
            if votum == 0 || votum > epoch.locked_balance(voter) {
                return invalid(format!("{voter} has an invalid votum {votum} on {implementation}"));
            }
            sum = sum.saturating_add(votum);
        }
        if sum != ballot.total_votes() {
            return invalid(format!("ballot total for {implementation} does not match its votes"));
        }
    }
    if epoch.voter_body_schedule().is_some() && epoch.council_schedule().is_some() {
        return invalid("both upgrade tracks are scheduled".into());
    }
    if epoch.council().is_zero() {
        return invalid("council is the zero address".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use upgov_nullables::NullClock;

    use crate::config::{AllocationConfig, TokenConfig};

    fn addr(n: u64) -> Address {
        Address::from_index(n)
    }

    fn token(clock: NullClock) -> UpgradeableToken<NullClock> {
        let config = TokenConfig {
            allocations: vec![
                AllocationConfig { account: addr(1), amount: 600 },
                AllocationConfig { account: addr(2), amount: 400 },
            ],
            ..Default::default()
        };
        UpgradeableToken::from_config(&config, clock).unwrap()
    }

    #[test]
    fn snapshot_preserves_governance_state() {
        let clock = NullClock::new(0);
        let mut original = token(clock.clone());
        original.lock(&addr(1), 300).unwrap();
        original.cast_vote(&addr(1), &addr(100)).unwrap();
        original.approve(&addr(2), &addr(3), 50).unwrap();

        let bytes = TokenSnapshot::capture(&original).to_bytes().unwrap();
        let restored = TokenSnapshot::from_bytes(&bytes).unwrap().restore(clock).unwrap();

        assert_eq!(restored.balance_of(&addr(1)), 600);
        assert_eq!(restored.allowance(&addr(2), &addr(3)), 50);
        assert_eq!(restored.locked_balance(&addr(1)), 300);
        assert_eq!(restored.governance().total_votes(&addr(100)), 300);
        assert_eq!(restored.governance().most_voted_implementation(), Some(addr(100)));
        assert_eq!(restored.governance_status(), original.governance_status());
    }

    #[test]
    fn restored_token_still_enforces_locks() {
        let clock = NullClock::new(0);
        let mut original = token(clock.clone());
        original.lock(&addr(1), 600).unwrap();
        let mut restored = TokenSnapshot::capture(&original).restore(clock).unwrap();
        assert!(restored.transfer(&addr(1), &addr(2), 1).is_err());
    }

    #[test]
    fn tampered_ledger_rejected() {
        let clock = NullClock::new(0);
        let mut original = token(clock.clone());
        original.lock(&addr(1), 600).unwrap();
        let mut snapshot = TokenSnapshot::capture(&original);
        for account in &mut snapshot.ledger.accounts {
            if account.address == addr(1) {
                account.balance = 100;
            }
        }
        // Tampered balances fail the ledger hash before the lock check.
        assert!(snapshot.restore(clock).is_err());
    }

    #[test]
    fn locks_exceeding_restored_balances_rejected() {
        let clock = NullClock::new(0);
        let mut original = token(clock.clone());
        original.lock(&addr(1), 600).unwrap();
        let mut snapshot = TokenSnapshot::capture(&original);

        // A self-consistent ledger in which addr(1) holds less than it locked.
        let mut poorer = token(clock.clone());
        poorer.transfer(&addr(1), &addr(2), 500).unwrap();
        snapshot.ledger = LedgerSnapshot::capture(poorer.ledger());

        assert!(matches!(
            snapshot.restore(clock),
            Err(TokenError::Snapshot(msg)) if msg.contains("locked")
        ));
    }

    #[test]
    fn garbage_bytes_are_snapshot_errors() {
        assert!(matches!(
            TokenSnapshot::from_bytes(&[0xff, 0x01]),
            Err(TokenError::Snapshot(_))
        ));
    }
}
