//! Shared per-group state.

use fc_core::{AgentId, GroupId, GroupState, Tick, Vec3};

/// The shared coordination state for one set of agents moving together.
///
/// Owned by the [`FormationEngine`][crate::FormationEngine]'s registry and
/// referenced from members by `GroupId` only, so removal can never leave a
/// dangling pointer.  Mutated by the registry during join/leave and by the
/// current leader during its tick — nothing else writes here.
#[derive(Debug, Clone)]
pub struct FormationGroup {
    pub id: GroupId,

    /// Life-cycle state, advanced by the leader.
    pub state: GroupState,

    /// The member currently driving the state machine; `INVALID` only for a
    /// group that failed by losing its leader under fail-on-removal.
    pub leader: AgentId,

    /// Membership in insertion order.  The order is significant: it is the
    /// default slot order, the leader-succession order, and the greedy
    /// assignment's iteration order.  The leader is always the first entry.
    pub members: Vec<AgentId>,

    /// The group's current aim point (its own anchor while forming, the
    /// task target once moving).
    pub target_position: Vec3,

    /// The group facing (unit vector), fixed when the group starts.
    pub direction: Vec3,

    /// Tick of creation / first join; gates the settling delay.
    pub start_tick: Tick,

    /// Cached "any member is out of range" bit from the last leader scan.
    /// A flip reapplies the catch-up policy even when no individual flag
    /// changed (covers an out-of-range member leaving the group).
    pub any_out_of_range: bool,
}

impl FormationGroup {
    /// A fresh group in `Initialized`, with no members yet.
    pub fn new(id: GroupId, now: Tick) -> Self {
        Self {
            id,
            state: GroupState::Initialized,
            leader: AgentId::INVALID,
            members: Vec::new(),
            target_position: Vec3::ZERO,
            direction: Vec3::Z,
            start_tick: now,
            any_out_of_range: false,
        }
    }

    /// Transition to `next`, logging the edge.  No-op when already there.
    pub fn set_state(&mut self, next: GroupState) {
        if next == self.state {
            return;
        }
        if next == GroupState::Failure {
            log::warn!("group {}: {} -> {}", self.id, self.state, next);
        } else {
            log::debug!("group {}: {} -> {}", self.id, self.state, next);
        }
        self.state = next;
    }

    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    #[inline]
    pub fn is_leader(&self, agent: AgentId) -> bool {
        self.leader == agent && agent.is_valid()
    }

    /// The cohesion reference member: the first non-leader in membership
    /// order.  `None` for a group of one.
    pub fn first_follower(&self) -> Option<AgentId> {
        self.members.iter().copied().find(|&a| a != self.leader)
    }
}
