//! Token-holder governance over which implementation a token runs.
//!
//! Two tracks can schedule an upgrade:
//!
//! - the **voter body**: holders lock tokens and vote with their full locked
//!   balance; the most-voted implementation may be scheduled once it has
//!   strictly more votes than the quorum threshold and enough supply is locked;
//! - the **council**: a privileged address that may schedule while the voter
//!   body has no qualifying decision. Its schedule is vetoable the moment the
//!   voter body qualifies.
//!
//! Either schedule matures after a fixed delay. Executing an upgrade ends the
//! current [`Epoch`]; locks, ballots and schedules start empty in the next.
//!
//! Components ([`LockLedger`], [`VoteTracker`], [`VoterBodyScheduler`],
//! [`CouncilScheduler`], [`UpgradeAuthorizer`]) operate on an explicit `&mut
//! Epoch`. [`GovernanceEngine`] owns the epochs and ties them together.

pub mod authorizer;
pub mod council;
pub mod engine;
pub mod epoch;
pub mod error;
pub mod event;
pub mod lock;
pub mod voter_body;
pub mod votes;

pub use authorizer::{UpgradeAuthorizer, UpgradeTrack};
pub use council::CouncilScheduler;
pub use engine::{GovernanceEngine, GovernanceStatus};
pub use epoch::{Ballot, Epoch, Qualification, ScheduledUpgrade};
pub use error::{ErrorKind, GovernanceError};
pub use event::{EventBus, GovernanceEvent};
pub use lock::LockLedger;
pub use voter_body::VoterBodyScheduler;
pub use votes::VoteTracker;
