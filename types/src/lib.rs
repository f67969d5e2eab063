//! Fundamental types for upgov.
//!
//! This crate defines the primitives shared across every other crate in the workspace:
//! addresses, timestamps and the clock abstraction, epoch identifiers, basis-point
//! arithmetic, and the governance parameters.

pub mod address;
pub mod amount;
pub mod epoch;
pub mod error;
pub mod params;
pub mod time;

pub use address::Address;
pub use amount::{apply_bps, BPS_DENOMINATOR};
pub use epoch::EpochId;
pub use error::TypesError;
pub use params::GovernanceParams;
pub use time::{Clock, SystemClock, Timestamp};
