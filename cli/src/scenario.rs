//! Scenario scripts: a token configuration plus a list of timed actions,
//! replayed in order against a fresh token.
//!
//! ```toml
//! start_time = 0
//!
//! [token]
//! council = "0x00000000000000000000000000000000000000c0"
//! initial_implementation = "0x0000000000000000000000000000000000000001"
//!
//! [[token.allocations]]
//! account = "0x000000000000000000000000000000000000a11c"
//! amount = 400
//!
//! [[steps]]
//! action = "lock"
//! account = "0x000000000000000000000000000000000000a11c"
//! value = 200
//!
//! [[steps]]
//! action = "schedule_voter_body"
//! expect = "err"
//! ```

use std::fmt;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use upgov_governance::GovernanceStatus;
use upgov_nullables::NullClock;
use upgov_token::{TokenConfig, TokenError, UpgradeableToken};
use upgov_types::{Address, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Mint { to: Address, value: u64 },
    Transfer { from: Address, to: Address, value: u64 },
    Lock { account: Address, value: u64 },
    TransferAndLock { from: Address, to: Address, value: u64 },
    Vote { voter: Address, implementation: Address },
    Revoke { voter: Address, implementation: Address },
    ScheduleVoterBody,
    CancelVoterBody,
    ScheduleCouncil { caller: Address, implementation: Address },
    CancelCouncil { caller: Address },
    VetoCouncil,
    TransferCouncil { caller: Address, council: Address },
    Upgrade { implementation: Address },
    AdvanceTime { secs: u64 },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mint { to, value } => write!(f, "mint {value} to {to}"),
            Self::Transfer { from, to, value } => write!(f, "transfer {value} {from} -> {to}"),
            Self::Lock { account, value } => write!(f, "lock {value} for {account}"),
            Self::TransferAndLock { from, to, value } => {
                write!(f, "transfer_and_lock {value} {from} -> {to}")
            }
            Self::Vote { voter, implementation } => write!(f, "vote {voter} for {implementation}"),
            Self::Revoke { voter, implementation } => write!(f, "revoke {voter} on {implementation}"),
            Self::ScheduleVoterBody => f.write_str("schedule voter body upgrade"),
            Self::CancelVoterBody => f.write_str("cancel voter body upgrade"),
            Self::ScheduleCouncil { implementation, .. } => {
                write!(f, "council schedules {implementation}")
            }
            Self::CancelCouncil { .. } => f.write_str("cancel council upgrade"),
            Self::VetoCouncil => f.write_str("veto council upgrade"),
            Self::TransferCouncil { council, .. } => write!(f, "transfer council to {council}"),
            Self::Upgrade { implementation } => write!(f, "upgrade to {implementation}"),
            Self::AdvanceTime { secs } => write!(f, "advance time {secs}s"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expect {
    Ok,
    Err,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,
    #[serde(default)]
    pub expect: Option<Expect>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub start_time: u64,
    pub token: TokenConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// What happened at one step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub time: Timestamp,
    pub action: String,
    pub result: Result<String, String>,
    /// `false` when the step carried an `expect` that did not hold.
    pub as_expected: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepOutcome>,
    pub final_time: Timestamp,
    pub delay_secs: u64,
    pub implementation: Address,
    pub status: GovernanceStatus,
}

impl ReplayReport {
    pub fn unexpected(&self) -> usize {
        self.steps.iter().filter(|s| !s.as_expected).count()
    }
}

impl Scenario {
    pub fn from_toml_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| format!("reading scenario {path}"))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing scenario {path}"))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let scenario: Self = toml::from_str(s)?;
        scenario.token.validate()?;
        Ok(scenario)
    }

    /// Run every step against a fresh token. A rejected step is recorded and
    /// the replay continues.
    pub fn replay(&self) -> anyhow::Result<ReplayReport> {
        let clock = NullClock::new(self.start_time);
        let mut token = UpgradeableToken::from_config(&self.token, clock.clone())
            .context("building token from scenario config")?;

        let mut steps = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let time = token.now();
            let result = apply(&mut token, &clock, &step.action).map_err(|e| e.to_string());
            let as_expected = match step.expect {
                Some(Expect::Ok) => result.is_ok(),
                Some(Expect::Err) => result.is_err(),
                None => true,
            };
            tracing::debug!(index, action = %step.action, ok = result.is_ok(), "step replayed");
            steps.push(StepOutcome {
                index,
                time,
                action: step.action.to_string(),
                result,
                as_expected,
            });
        }

        Ok(ReplayReport {
            steps,
            final_time: token.now(),
            delay_secs: self.token.governance.delay_duration_secs,
            implementation: token.implementation(),
            status: token.governance_status(),
        })
    }
}

fn apply(token: &mut UpgradeableToken<NullClock>, clock: &NullClock, action: &Action) -> Result<String, TokenError> {
    let done = || "ok".to_string();
    match action {
        Action::Mint { to, value } => token.mint(to, u128::from(*value)).map(|_| done()),
        Action::Transfer { from, to, value } => token.transfer(from, to, u128::from(*value)).map(|_| done()),
        Action::Lock { account, value } => token
            .lock(account, u128::from(*value))
            .map(|_| format!("locked {}", token.locked_balance(account))),
        Action::TransferAndLock { from, to, value } => token
            .transfer_and_lock(from, to, u128::from(*value))
            .map(|_| format!("locked {}", token.locked_balance(to))),
        Action::Vote { voter, implementation } => token
            .cast_vote(voter, implementation)
            .map(|_| format!("total votes {}", token.governance().total_votes(implementation))),
        Action::Revoke { voter, implementation } => token
            .revoke_vote(voter, implementation)
            .map(|_| format!("total votes {}", token.governance().total_votes(implementation))),
        Action::ScheduleVoterBody => token
            .schedule_voter_body_upgrade()
            .map(|s| format!("{} scheduled until {}", s.implementation, s.end_time)),
        Action::CancelVoterBody => token.cancel_voter_body_upgrade().map(|_| done()),
        Action::ScheduleCouncil { caller, implementation } => token
            .schedule_council_upgrade(caller, implementation)
            .map(|s| format!("{} scheduled until {}", s.implementation, s.end_time)),
        Action::CancelCouncil { caller } => token.cancel_council_upgrade(caller).map(|_| done()),
        Action::VetoCouncil => token.veto_council_upgrade().map(|_| done()),
        Action::TransferCouncil { caller, council } => token.transfer_council(caller, council).map(|_| done()),
        Action::Upgrade { implementation } => token
            .upgrade_to(implementation)
            .map(|track| format!("{track:?} track, now {}", token.governance().current_epoch())),
        Action::AdvanceTime { secs } => {
            clock.advance(*secs);
            Ok(format!("now {}", token.now()))
        }
    }
}
