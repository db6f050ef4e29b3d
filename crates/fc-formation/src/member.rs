//! Per-member state and member-level control policies.

use std::sync::Arc;

use fc_core::{AgentId, GroupId, SimClock, SlotId, Vec3};
use fc_nav::PathFollower;
use fc_shape::SlotShape;

use crate::{FormationGroup, MemberConfig};

/// Velocity magnitude below which a member counts as not moving.
pub(crate) const VELOCITY_EPS: f32 = 1e-3;

// ── StuckDetector ─────────────────────────────────────────────────────────────

/// Tracks how long a member has had an active, unarrived path while barely
/// moving.
///
/// The flag latches after `stuck_duration_secs` of continuous near-zero
/// velocity and resets the instant the member moves again (or loses its
/// path / arrives — stuck is only defined for an active, unreached
/// destination).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StuckDetector {
    pub is_stuck: bool,
    /// Consecutive ticks spent blocked so far.
    pub blocked_ticks: u64,
}

impl StuckDetector {
    pub fn update(
        &mut self,
        path_active: bool,
        speed: f32,
        clock: &SimClock,
        threshold_secs: f32,
    ) {
        if path_active && speed < VELOCITY_EPS {
            self.blocked_ticks += 1;
            if self.blocked_ticks as f32 * clock.dt_secs() >= threshold_secs {
                self.is_stuck = true;
            }
        } else {
            self.blocked_ticks = 0;
            self.is_stuck = false;
        }
    }
}

// ── FormationMember ───────────────────────────────────────────────────────────

/// Per-agent coordination state.
///
/// Holds a `GroupId` handle rather than any reference into the group — the
/// group is looked up in the registry on every operation, so teardown in
/// any order is safe.
pub struct FormationMember {
    pub agent: AgentId,

    /// Handle to the group this member belongs to.
    pub group: GroupId,

    /// Assigned formation slot; `SlotId::INVALID` until assignment.
    pub slot: SlotId,

    /// The last slot position computed for (and pushed to) this member.
    pub desired_position: Option<Vec3>,

    /// Behind the group's cohesion tolerance (hysteresis applied).
    pub out_of_range: bool,

    pub stuck: StuckDetector,

    /// Movement speed cached at join time; restored when the member is
    /// released and used as the base of the catch-up policy.
    pub original_speed: f32,

    pub config: MemberConfig,

    /// The slot pattern.  The leader's shape governs group decisions; each
    /// member still carries one so leadership can move.
    pub shape: Arc<dyn SlotShape>,
}

impl FormationMember {
    pub fn new(
        agent: AgentId,
        group: GroupId,
        config: MemberConfig,
        shape: Arc<dyn SlotShape>,
        original_speed: f32,
    ) -> Self {
        Self {
            agent,
            group,
            slot: SlotId::INVALID,
            desired_position: None,
            out_of_range: false,
            stuck: StuckDetector::default(),
            original_speed,
            config,
            shape,
        }
    }

    /// The world position of this member's slot for the group's current
    /// geometry.
    pub fn slot_position(&self, group: &FormationGroup, snap_to_terrain: bool) -> Vec3 {
        self.shape.slot_position(
            self.slot.index(),
            group.member_count(),
            group.target_position,
            group.direction,
            snap_to_terrain,
        )
    }

    /// Recompute the desired position and hand it to the follower.
    ///
    /// `precomputed` skips the shape query when the caller already has the
    /// position (the greedy assignment does).  With `snap_to_terrain`, the
    /// result is first snapped through the follower; a failed sample keeps
    /// the raw position.  A rejected destination is kept as
    /// `desired_position` and re-issued on the member's next tick.
    pub fn refresh_destination(
        &mut self,
        group: &FormationGroup,
        follower: &mut dyn PathFollower,
        precomputed: Option<Vec3>,
        snap_to_terrain: bool,
    ) -> Vec3 {
        let mut pos = precomputed.unwrap_or_else(|| self.slot_position(group, snap_to_terrain));
        if snap_to_terrain && !follower.sample_position(&mut pos) {
            log::debug!("{}: no traversable terrain near {pos}", self.agent);
        }
        if !follower.set_destination(pos) {
            log::debug!("{}: destination {pos} rejected, will retry", self.agent);
        }
        self.desired_position = Some(pos);
        pos
    }

    /// `true` once `facing` is within the configured threshold of
    /// `direction`.
    pub fn rotation_complete(&self, facing: Vec3, direction: Vec3) -> bool {
        facing.angle_to(direction).to_degrees() <= self.config.rotation_threshold_deg
    }

    /// Turn the follower toward `direction` by one tick's worth of the
    /// configured angular rate.  Stops turning inside the threshold.
    pub fn rotate_toward(
        &self,
        follower: &mut dyn PathFollower,
        direction: Vec3,
        dt_secs: f32,
    ) {
        let facing = follower.facing();
        if self.rotation_complete(facing, direction) {
            return;
        }
        let step = (self.config.rotation_speed_deg * dt_secs).to_radians();
        follower.set_facing(facing.rotate_towards(direction, step));
    }
}
