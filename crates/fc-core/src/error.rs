//! Framework error type.
//!
//! `fc-formation` uses `FcError` directly; `fc-sim` wraps it as one variant
//! of its own enum.  Both patterns are acceptable; prefer whichever keeps
//! error sites clean.

use thiserror::Error;

use crate::{AgentId, GroupId, GroupState};

/// The top-level error type for `fc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FcError {
    #[error("agent {0} is not a formation member")]
    NotAMember(AgentId),

    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("group {0} is {1} and closed to new members")]
    GroupClosed(GroupId, GroupState),

    #[error("agent {0} has no path follower")]
    NoFollower(AgentId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `fc-*` crates.
pub type FcResult<T> = Result<T, FcError>;
