//! The upgradeable token.
//!
//! Holds the ledger, the governance engine and the proxy's implementation
//! slot, and supplies the two values governance needs from outside: total
//! supply (from the ledger) and "now" (from the injected [`Clock`]).

use upgov_governance::{
    EventBus, GovernanceEngine, GovernanceError, GovernanceEvent, GovernanceStatus, ScheduledUpgrade,
    UpgradeTrack,
};
use upgov_ledger::TokenLedger;
use upgov_types::{Address, Clock, EpochId, Timestamp};

use crate::config::TokenConfig;
use crate::error::TokenError;
use crate::event::TokenEvent;
use crate::guard::LockGuard;

pub struct UpgradeableToken<C: Clock> {
    pub(crate) name: String,
    pub(crate) symbol: String,
    pub(crate) decimals: u8,
    pub(crate) ledger: TokenLedger,
    pub(crate) governance: GovernanceEngine,
    pub(crate) implementation: Address,
    /// Which implementation was active in each epoch, oldest first.
    pub(crate) history: Vec<(EpochId, Address)>,
    clock: C,
    events: EventBus<TokenEvent>,
}

impl<C: Clock> UpgradeableToken<C> {
    pub fn from_config(config: &TokenConfig, clock: C) -> Result<Self, TokenError> {
        config.validate()?;
        let ledger = TokenLedger::from_genesis(&config.genesis())?;
        let governance = GovernanceEngine::new(config.governance.clone(), config.council)?;
        tracing::info!(
            name = %config.name,
            symbol = %config.symbol,
            total_supply = ledger.total_supply(),
            implementation = %config.initial_implementation,
            "token created"
        );
        Ok(Self::from_parts(
            config.name.clone(),
            config.symbol.clone(),
            config.decimals,
            ledger,
            governance,
            config.initial_implementation,
            vec![(EpochId::GENESIS, config.initial_implementation)],
            clock,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        name: String,
        symbol: String,
        decimals: u8,
        ledger: TokenLedger,
        governance: GovernanceEngine,
        implementation: Address,
        history: Vec<(EpochId, Address)>,
        clock: C,
    ) -> Self {
        Self {
            name,
            symbol,
            decimals,
            ledger,
            governance,
            implementation,
            history,
            clock,
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&TokenEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn subscribe_governance(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.governance.subscribe(listener);
    }

    fn emit(&self, event: TokenEvent) {
        self.events.emit(&event);
    }

    // ── Views ───────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn implementation(&self) -> Address {
        self.implementation
    }

    pub fn implementation_history(&self) -> &[(EpochId, Address)] {
        &self.history
    }

    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    pub fn governance(&self) -> &GovernanceEngine {
        &self.governance
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.ledger.balance_of(account)
    }

    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.ledger.allowance(owner, spender)
    }

    pub fn locked_balance(&self, account: &Address) -> u128 {
        self.governance.locked_balance(account)
    }

    pub fn unlocked_balance(&self, account: &Address) -> u128 {
        self.governance
            .unlocked_balance(account, self.ledger.balance_of(account))
    }

    pub fn governance_status(&self) -> GovernanceStatus {
        self.governance.status(self.ledger.total_supply())
    }

    // ── Ledger operations ───────────────────────────────────────────────

    /// Issue new tokens. Who may mint is the deployer's policy, not the token's.
    pub fn mint(&mut self, to: &Address, value: u128) -> Result<(), TokenError> {
        let transfer = self.ledger.mint(to, value)?;
        tracing::info!(to = %to, value, "minted");
        self.emit(TokenEvent::Transfer(transfer));
        Ok(())
    }

    pub fn burn(&mut self, from: &Address, value: u128) -> Result<(), TokenError> {
        let transfer = self
            .ledger
            .burn(from, value, &LockGuard::new(&self.governance))?;
        tracing::info!(from = %from, value, "burned");
        self.emit(TokenEvent::Transfer(transfer));
        Ok(())
    }

    pub fn transfer(&mut self, from: &Address, to: &Address, value: u128) -> Result<(), TokenError> {
        let transfer = self
            .ledger
            .transfer(from, to, value, &LockGuard::new(&self.governance))
            .inspect_err(|e| tracing::debug!(from = %from, to = %to, value, error = %e, "transfer rejected"))?;
        self.emit(TokenEvent::Transfer(transfer));
        Ok(())
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, value: u128) -> Result<(), TokenError> {
        let approval = self.ledger.approve(owner, spender, value)?;
        self.emit(TokenEvent::Approval(approval));
        Ok(())
    }

    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        value: u128,
    ) -> Result<(), TokenError> {
        let transfer = self
            .ledger
            .transfer_from(spender, from, to, value, &LockGuard::new(&self.governance))?;
        self.emit(TokenEvent::Transfer(transfer));
        Ok(())
    }

    // ── Locking ─────────────────────────────────────────────────────────

    pub fn lock(&mut self, account: &Address, value: u128) -> Result<(), TokenError> {
        let balance = self.ledger.balance_of(account);
        self.governance.lock(account, value, balance)?;
        Ok(())
    }

    /// Transfer `value` to `to` and lock it there in one step.
    pub fn transfer_and_lock(&mut self, from: &Address, to: &Address, value: u128) -> Result<(), TokenError> {
        if value == 0 {
            return Err(GovernanceError::ZeroAmount.into());
        }
        let transfer = self
            .ledger
            .transfer(from, to, value, &LockGuard::new(&self.governance))?;
        // `to` just received `value` of unlocked balance, and locked supply
        // never exceeds total supply, so the lock cannot fail here.
        let balance = self.ledger.balance_of(to);
        self.governance.lock(to, value, balance)?;
        self.emit(TokenEvent::Transfer(transfer));
        Ok(())
    }

    // ── Voting ──────────────────────────────────────────────────────────

    pub fn cast_vote(&mut self, voter: &Address, implementation: &Address) -> Result<(), TokenError> {
        Ok(self.governance.cast_vote(voter, implementation)?)
    }

    pub fn revoke_vote(&mut self, voter: &Address, implementation: &Address) -> Result<(), TokenError> {
        Ok(self.governance.revoke_vote(voter, implementation)?)
    }

    // ── Scheduling ──────────────────────────────────────────────────────

    pub fn schedule_voter_body_upgrade(&mut self) -> Result<ScheduledUpgrade, TokenError> {
        let (supply, now) = (self.ledger.total_supply(), self.clock.now());
        Ok(self.governance.schedule_voter_body_upgrade(supply, now)?)
    }

    pub fn cancel_voter_body_upgrade(&mut self) -> Result<(), TokenError> {
        let (supply, now) = (self.ledger.total_supply(), self.clock.now());
        Ok(self.governance.cancel_voter_body_upgrade(supply, now)?)
    }

    pub fn schedule_council_upgrade(
        &mut self,
        caller: &Address,
        implementation: &Address,
    ) -> Result<ScheduledUpgrade, TokenError> {
        let (supply, now) = (self.ledger.total_supply(), self.clock.now());
        Ok(self
            .governance
            .schedule_council_upgrade(caller, implementation, supply, now)?)
    }

    pub fn cancel_council_upgrade(&mut self, caller: &Address) -> Result<(), TokenError> {
        Ok(self.governance.cancel_council_upgrade(caller)?)
    }

    pub fn veto_council_upgrade(&mut self) -> Result<(), TokenError> {
        let supply = self.ledger.total_supply();
        Ok(self.governance.veto_council_upgrade(supply)?)
    }

    pub fn transfer_council(&mut self, caller: &Address, new_council: &Address) -> Result<(), TokenError> {
        Ok(self.governance.transfer_council(caller, new_council)?)
    }

    // ── Upgrade ─────────────────────────────────────────────────────────

    /// The proxy's authorization callback.
    pub fn authorize_upgrade(&self, candidate: &Address) -> Result<UpgradeTrack, TokenError> {
        Ok(self
            .governance
            .authorize_upgrade(candidate, self.ledger.total_supply(), self.clock.now())?)
    }

    /// Switch to `candidate` if governance authorises it.
    ///
    /// On success the current epoch ends: the next one starts with nothing
    /// locked, no ballots and no schedules. Token balances are unaffected.
    pub fn upgrade_to(&mut self, candidate: &Address) -> Result<UpgradeTrack, TokenError> {
        let track = self.authorize_upgrade(candidate)?;
        let previous = std::mem::replace(&mut self.implementation, *candidate);
        let epoch = self.governance.advance_epoch();
        self.history.push((epoch, *candidate));
        tracing::info!(
            %previous,
            implementation = %candidate,
            ?track,
            %epoch,
            "implementation upgraded"
        );
        self.emit(TokenEvent::Upgraded {
            previous,
            implementation: *candidate,
            track,
            epoch,
        });
        Ok(track)
    }
}

impl<C: Clock> std::fmt::Debug for UpgradeableToken<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpgradeableToken")
            .field("symbol", &self.symbol)
            .field("implementation", &self.implementation)
            .field("epoch", &self.governance.current_epoch())
            .field("total_supply", &self.ledger.total_supply())
            .finish()
    }
}
