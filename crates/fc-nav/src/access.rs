//! `NavAccess` — follower lookup by agent ID.
//!
//! The host owns its followers; the engine borrows them one at a time
//! through this trait during a tick.  Implementations are provided for the
//! obvious arenas: a slice or `Vec` indexed by `AgentId::index()` (dense
//! ids), and a `HashMap` keyed by `AgentId` (sparse ids).

use std::collections::HashMap;

use fc_core::AgentId;

use crate::PathFollower;

/// Mutable access to one follower per agent.
pub trait NavAccess {
    /// The follower for `agent`, or `None` if the host knows no such agent.
    fn follower_mut(&mut self, agent: AgentId) -> Option<&mut dyn PathFollower>;
}

impl<F: PathFollower> NavAccess for [F] {
    fn follower_mut(&mut self, agent: AgentId) -> Option<&mut dyn PathFollower> {
        self.get_mut(agent.index())
            .map(|f| f as &mut dyn PathFollower)
    }
}

impl<F: PathFollower> NavAccess for Vec<F> {
    fn follower_mut(&mut self, agent: AgentId) -> Option<&mut dyn PathFollower> {
        self.as_mut_slice().follower_mut(agent)
    }
}

impl<F: PathFollower> NavAccess for HashMap<AgentId, F> {
    fn follower_mut(&mut self, agent: AgentId) -> Option<&mut dyn PathFollower> {
        self.get_mut(&agent).map(|f| f as &mut dyn PathFollower)
    }
}
