//! An upgradeable fungible token governed by its holders.
//!
//! [`UpgradeableToken`] composes the ledger, the governance engine and the
//! proxy's implementation slot. Every balance decrease on the ledger passes
//! through [`LockGuard`], so locked balance cannot leave an account until an
//! upgrade ends the epoch.

pub mod config;
pub mod error;
pub mod event;
pub mod guard;
pub mod snapshot;
pub mod token;

pub use config::{AllocationConfig, TokenConfig};
pub use error::TokenError;
pub use event::TokenEvent;
pub use guard::LockGuard;
pub use snapshot::TokenSnapshot;
pub use token::UpgradeableToken;
