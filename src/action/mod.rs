//! User-initiated mutations and their visible status.
//!
//! One [`StatusBoard`] slot per [`ActionKind`]; a newer action of the same kind
//! takes the slot over and bumps its generation, so completions and revert
//! timers belonging to the older one are recognised as stale.

pub mod executor;
pub mod intent;
pub mod membership;
pub mod projects;
pub mod status;

pub use executor::{ActionExecutor, DelayedTask};
pub use intent::{ActionIntent, ActionOutput, GENERIC_FAILURE};
pub use projects::{ProjectActions, RemoteApply};
pub use status::{ActionKind, ActionStatus, Generation, Phase};
