//! Token configuration, loaded from TOML.
//!
//! ```toml
//! name = "Governed Token"
//! symbol = "GOV"
//! decimals = 18
//! council = "0x00000000000000000000000000000000000000c0"
//! initial_implementation = "0x0000000000000000000000000000000000000001"
//!
//! [governance]
//! delay_duration_secs = 1209600
//!
//! [[allocations]]
//! account = "0x000000000000000000000000000000000000a11c"
//! amount = 1000000
//! ```

use serde::{Deserialize, Serialize};
use upgov_ledger::GenesisAllocation;
use upgov_types::{Address, GovernanceParams};

use crate::error::TokenError;

/// One genesis mint. TOML integers are signed 64-bit, so amounts are `u64`
/// here and widened when the ledger is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub account: Address,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimals")]
    pub decimals: u8,

    pub council: Address,

    pub initial_implementation: Address,

    #[serde(default)]
    pub governance: GovernanceParams,

    #[serde(default)]
    pub allocations: Vec<AllocationConfig>,
}

// ── Default value functions ─────────────────────────────────────────────

fn default_name() -> String {
    "Governed Token".to_string()
}

fn default_symbol() -> String {
    "GOV".to_string()
}

fn default_decimals() -> u8 {
    18
}

impl TokenConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, TokenError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TokenError::Config(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, TokenError> {
        let config: Self = toml::from_str(s).map_err(|e| TokenError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, TokenError> {
        toml::to_string_pretty(self).map_err(|e| TokenError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), TokenError> {
        self.governance
            .validate()
            .map_err(|e| TokenError::Config(e.to_string()))?;
        if self.council.is_zero() {
            return Err(TokenError::Config("council must not be the zero address".into()));
        }
        if self.initial_implementation.is_zero() {
            return Err(TokenError::Config(
                "initial_implementation must not be the zero address".into(),
            ));
        }
        Ok(())
    }

    pub fn genesis(&self) -> Vec<GenesisAllocation> {
        self.allocations
            .iter()
            .map(|a| GenesisAllocation {
                account: a.account,
                amount: u128::from(a.amount),
            })
            .collect()
    }
}

impl Default for TokenConfig {
    /// Placeholder identities; real deployments set both addresses.
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
            council: Address::from_index(0xc0),
            initial_implementation: Address::from_index(1),
            governance: GovernanceParams::default(),
            allocations: Vec::new(),
        }
    }
}
