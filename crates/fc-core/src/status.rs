//! Shared life-cycle vocabulary: group states and per-tick member results.

use std::fmt;

// ── GroupState ────────────────────────────────────────────────────────────────

/// The shared movement life-cycle of a formation group.
///
/// Advanced only by the group's current leader during its own tick:
///
/// `Initialized → MoveToFormation → MoveToTarget → Arrived`
///
/// with `Failure` reachable from either moving state (a stuck member, or a
/// leader removed under a fail-on-removal policy).  `Arrived` and `Failure`
/// are terminal: the group accepts no new members and never transitions
/// again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GroupState {
    /// Created; waiting out the settling delay before slots are assigned.
    Initialized,
    /// Members are moving to (or rotating at) their assigned slots.
    MoveToFormation,
    /// The formation is moving toward the task's true target.
    MoveToTarget,
    /// Every member reached its final slot.  Terminal.
    Arrived,
    /// Coordination failed; broadcast to every member.  Terminal.
    Failure,
}

impl GroupState {
    /// `true` for the two states a group can never leave.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, GroupState::Arrived | GroupState::Failure)
    }
}

impl fmt::Display for GroupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GroupState::Initialized => "initialized",
            GroupState::MoveToFormation => "move-to-formation",
            GroupState::MoveToTarget => "move-to-target",
            GroupState::Arrived => "arrived",
            GroupState::Failure => "failure",
        };
        f.write_str(s)
    }
}

// ── TickStatus ────────────────────────────────────────────────────────────────

/// The ternary result a member controller reports to the host executor each
/// tick.
///
/// `Succeeded` and `Failed` are sticky from the member's point of view: once
/// its group is terminal every further tick resolves immediately to the same
/// status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TickStatus {
    Running,
    Succeeded,
    Failed,
}

impl TickStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != TickStatus::Running
    }
}

impl fmt::Display for TickStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TickStatus::Running => "running",
            TickStatus::Succeeded => "succeeded",
            TickStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}
