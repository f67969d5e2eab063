//! Governance parameters.
//!
//! These are fixed for the life of a deployment and loaded from the token's
//! TOML configuration. Every field has a serde default so a partial
//! `[governance]` table is valid.

use serde::{Deserialize, Serialize};

use crate::amount::{apply_bps, BPS_DENOMINATOR};
use crate::error::TypesError;

/// Thresholds and timing for upgrade governance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Mandatory wait between scheduling an upgrade and executing it.
    /// Default: 14 days.
    #[serde(default = "default_delay_duration_secs")]
    pub delay_duration_secs: u64,

    /// Quorum as a fraction of the locked supply (basis points).
    /// A proposal qualifies only with strictly more votes than this share.
    /// Default: 5000 (one half).
    #[serde(default = "default_quorum_bps")]
    pub quorum_bps: u32,

    /// Minimum locked supply as a fraction of total token supply (basis points).
    /// Default: 2500 (25%).
    #[serde(default = "default_min_locked_supply_bps")]
    pub min_locked_supply_bps: u32,
}

fn default_delay_duration_secs() -> u64 {
    14 * 24 * 3600
}

fn default_quorum_bps() -> u32 {
    5_000
}

fn default_min_locked_supply_bps() -> u32 {
    2_500
}

impl GovernanceParams {
    /// `floor(locked_supply * quorum_bps / 10_000)`.
    pub fn quorum_threshold(&self, locked_supply: u128) -> u128 {
        apply_bps(locked_supply, self.quorum_bps)
    }

    /// `floor(total_supply * min_locked_supply_bps / 10_000)`.
    pub fn min_locked_supply(&self, total_supply: u128) -> u128 {
        apply_bps(total_supply, self.min_locked_supply_bps)
    }

    /// Reject parameter sets that would make governance meaningless.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.delay_duration_secs == 0 {
            return Err(TypesError::InvalidParam {
                name: "delay_duration_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if self.quorum_bps > BPS_DENOMINATOR {
            return Err(TypesError::InvalidParam {
                name: "quorum_bps",
                reason: format!("{} exceeds {}", self.quorum_bps, BPS_DENOMINATOR),
            });
        }
        if self.min_locked_supply_bps > BPS_DENOMINATOR {
            return Err(TypesError::InvalidParam {
                name: "min_locked_supply_bps",
                reason: format!("{} exceeds {}", self.min_locked_supply_bps, BPS_DENOMINATOR),
            });
        }
        Ok(())
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            delay_duration_secs: default_delay_duration_secs(),
            quorum_bps: default_quorum_bps(),
            min_locked_supply_bps: default_min_locked_supply_bps(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_two_week_half_quorum() {
        let params = GovernanceParams::default();
        assert_eq!(params.delay_duration_secs, 1_209_600);
        assert_eq!(params.quorum_threshold(100), 50);
        assert_eq!(params.quorum_threshold(101), 50);
        assert_eq!(params.min_locked_supply(400), 100);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let params: GovernanceParams = toml::from_str("quorum_bps = 6000").unwrap();
        assert_eq!(params.quorum_bps, 6_000);
        assert_eq!(params.min_locked_supply_bps, 2_500);
        assert_eq!(params.delay_duration_secs, 1_209_600);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let zero_delay = GovernanceParams {
            delay_duration_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_delay.validate(),
            Err(TypesError::InvalidParam { name: "delay_duration_secs", .. })
        ));

        let big_quorum = GovernanceParams {
            quorum_bps: 10_001,
            ..Default::default()
        };
        assert!(matches!(
            big_quorum.validate(),
            Err(TypesError::InvalidParam { name: "quorum_bps", .. })
        ));
    }
}
