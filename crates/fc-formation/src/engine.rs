//! `FormationEngine` — the group registry and the member-controller tick.
//!
//! The engine owns both arenas (groups by `GroupId`, members by `AgentId`)
//! and is constructor-injected into the host — there is no global registry.
//! Path followers stay with the host and are borrowed per call through
//! [`NavAccess`].
//!
//! # Tick structure
//!
//! [`FormationEngine::tick`] runs one member's controller:
//!
//! 1. resolve the member and its group; a terminal group state resolves the
//!    tick immediately (`Arrived` → `Succeeded`, `Failure` → `Failed`), as
//!    does a missing member, group, or follower;
//! 2. motion upkeep: re-issue a previously rejected destination, converge
//!    rotation once parked at the slot;
//! 3. leader only: advance the group state machine;
//! 4. update the member's own stuck detector (observed by the leader on its
//!    next tick);
//! 5. report `Running`.
//!
//! A state change made by the leader this tick is deliberately *not*
//! re-checked at the end: members — including the leader itself — observe
//! `Arrived`/`Failure` on their next tick.

use std::sync::Arc;

use fc_core::{
    AgentId, FcError, FcResult, GroupId, GroupState, SimClock, SlotId, Tick, TickStatus, Vec3,
};
use fc_nav::NavAccess;
use fc_shape::SlotShape;

use crate::assign::assign_slots;
use crate::{FormationGroup, FormationMember, MemberConfig, OrientationMode};

// With the `fx-hash` feature the registry maps swap SipHash for FxHash;
// lookups are per-member-per-tick, so the integer-key speedup is worthwhile.
#[cfg(feature = "fx-hash")]
pub(crate) type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

pub(crate) type MemberMap = Map<AgentId, FormationMember>;

/// The registry of live groups and members, plus all coordination logic.
#[derive(Default)]
pub struct FormationEngine {
    pub(crate) groups: Map<GroupId, FormationGroup>,
    pub(crate) members: MemberMap,
}

impl FormationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn group(&self, id: GroupId) -> Option<&FormationGroup> {
        self.groups.get(&id)
    }

    pub fn member(&self, agent: AgentId) -> Option<&FormationMember> {
        self.members.get(&agent)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    // ── Membership mutation ───────────────────────────────────────────────

    /// The group registered under `id`, created in `Initialized` (with its
    /// settling timer seeded from the current tick) if absent.
    pub fn get_or_create_group(&mut self, id: GroupId, clock: &SimClock) -> &mut FormationGroup {
        get_or_create(&mut self.groups, id, clock.current_tick)
    }

    /// Add `agent` to `group_id`, creating the group (in `Initialized`) on
    /// first join.
    ///
    /// A member already in some group leaves it first.  Joining a terminal
    /// group is rejected — `Arrived`/`Failure` groups are closed.  The first
    /// member becomes leader and seeds the settling timer; a forced leader
    /// takes the head seat unless the current leader also holds the forced
    /// flag.  Joining a group that is already past `Initialized` integrates
    /// immediately: the newcomer takes the next slot and every member's
    /// destination is refreshed for the new group size.
    pub fn join(
        &mut self,
        group_id: GroupId,
        agent: AgentId,
        config: MemberConfig,
        shape: Arc<dyn SlotShape>,
        nav: &mut dyn NavAccess,
        clock: &SimClock,
    ) -> FcResult<()> {
        config.validate()?;

        if self.members.contains_key(&agent) {
            self.leave(agent, nav);
        }

        let original_speed = nav
            .follower_mut(agent)
            .ok_or(FcError::NoFollower(agent))?
            .speed();

        let now = clock.current_tick;
        let group = get_or_create(&mut self.groups, group_id, now);

        if group.state.is_terminal() {
            return Err(FcError::GroupClosed(group_id, group.state));
        }

        // Seating.  A forced leader takes the head of the line unless the
        // seat is already held by force; otherwise newcomers queue at the
        // back and only an empty group makes them leader.
        let leader_holds_force = group.leader.is_valid()
            && self
                .members
                .get(&group.leader)
                .is_some_and(|m| m.config.forced_leader);

        if config.forced_leader && !leader_holds_force {
            group.members.insert(0, agent);
            group.leader = agent;
            if group.members.len() == 1 {
                group.start_tick = now;
            }
            log::debug!("group {group_id}: {agent} joined as forced leader");
        } else {
            group.members.push(agent);
            if group.members.len() == 1 {
                group.leader = agent;
                group.start_tick = now;
            }
            log::debug!("group {group_id}: {agent} joined");
        }

        let state = group.state;
        let count = group.member_count();
        self.members.insert(
            agent,
            FormationMember::new(agent, group_id, config, shape, original_speed),
        );

        if state != GroupState::Initialized {
            // Late join: the group keeps moving, the newcomer takes the last
            // slot, and everyone's destination accounts for the new size.
            if let Some(member) = self.members.get_mut(&agent) {
                member.slot = SlotId::try_from(count - 1).unwrap_or(SlotId::INVALID);
            }
            let snap = state == GroupState::MoveToTarget;
            let pre_position = self
                .members
                .get(&group.leader)
                .is_some_and(|m| m.shape.allows_pre_formation_movement());
            let group = &*group;
            for i in 0..group.members.len() {
                let aid = group.members[i];
                let Some(member) = self.members.get_mut(&aid) else {
                    continue;
                };
                if !member.slot.is_valid() {
                    continue;
                }
                let Some(follower) = nav.follower_mut(aid) else {
                    continue;
                };
                if snap || pre_position {
                    member.refresh_destination(group, follower, None, snap);
                } else {
                    // Forming without pre-positioning: record the slot but
                    // do not start anyone moving.
                    member.desired_position = Some(member.slot_position(group, false));
                }
            }
        }
        Ok(())
    }

    /// Remove `agent` from its group.
    ///
    /// Returns `false` (a silent no-op) when `agent` is not a member —
    /// shutdown ordering routinely produces such calls.  Restores the
    /// follower's cached speed.  An emptied group is discarded.  Removing
    /// the leader passes leadership to the new first member, unless the
    /// leaving leader's policy is fail-on-removal, which forces `Failure`
    /// with no succession.  With reindex-on-removal, later slots shift down
    /// and their destinations are refreshed.
    pub fn leave(&mut self, agent: AgentId, nav: &mut dyn NavAccess) -> bool {
        let Some(member) = self.members.remove(&agent) else {
            return false;
        };

        if let Some(follower) = nav.follower_mut(agent) {
            follower.set_speed(member.original_speed);
        }

        let group_id = member.group;
        let dissolve = {
            let Some(group) = self.groups.get_mut(&group_id) else {
                // Group already gone — e.g. the registry was torn down first.
                return true;
            };
            let Some(position) = group.members.iter().position(|&a| a == agent) else {
                return true;
            };
            group.members.remove(position);
            log::debug!("group {group_id}: {agent} left");

            if group.members.is_empty() {
                true
            } else {
                if group.leader == agent {
                    if member.config.fail_on_removal {
                        group.leader = AgentId::INVALID;
                        group.set_state(GroupState::Failure);
                        return true;
                    }
                    group.leader = group.members[0];
                    log::debug!(
                        "group {group_id}: leadership passed to {}",
                        group.leader
                    );
                }

                if member.config.reindex_on_removal
                    && member.slot.is_valid()
                    && !group.state.is_terminal()
                {
                    let removed_slot = member.slot;
                    let snap = group.state == GroupState::MoveToTarget;
                    let group = &*group;
                    for i in 0..group.members.len() {
                        let aid = group.members[i];
                        let Some(m) = self.members.get_mut(&aid) else {
                            continue;
                        };
                        if !m.slot.is_valid() || m.slot <= removed_slot {
                            continue;
                        }
                        m.slot = SlotId(m.slot.0 - 1);
                        if let Some(follower) = nav.follower_mut(aid) {
                            m.refresh_destination(group, follower, None, snap);
                        }
                    }
                }
                false
            }
        };

        if dissolve {
            self.groups.remove(&group_id);
            log::debug!("group {group_id}: dissolved");
        }
        true
    }

    /// (Re)assign slot indices for `group_id` per the leader's shape.
    ///
    /// Unknown groups are a no-op.  See [`crate::assign`] for the two
    /// assignment regimes.
    pub fn assign_indices(&mut self, group_id: GroupId, nav: &mut dyn NavAccess) {
        let Self { groups, members } = self;
        let Some(group) = groups.get_mut(&group_id) else {
            return;
        };
        assign_slots(group, members, nav);
    }

    // ── Per-tick member controller ────────────────────────────────────────

    /// Run one member's controller for the current tick.
    pub fn tick(
        &mut self,
        agent: AgentId,
        nav: &mut dyn NavAccess,
        clock: &SimClock,
    ) -> TickStatus {
        // Resolve membership; terminal group states short-circuit.
        let (group_id, state, direction, is_leader) = {
            let Some(member) = self.members.get(&agent) else {
                return TickStatus::Failed;
            };
            let Some(group) = self.groups.get(&member.group) else {
                return TickStatus::Failed;
            };
            match group.state {
                GroupState::Arrived => return TickStatus::Succeeded,
                GroupState::Failure => return TickStatus::Failed,
                _ => {}
            }
            (member.group, group.state, group.direction, group.is_leader(agent))
        };

        // Motion upkeep for this member.
        {
            let Some(member) = self.members.get_mut(&agent) else {
                return TickStatus::Failed;
            };
            let Some(follower) = nav.follower_mut(agent) else {
                return TickStatus::Failed;
            };
            // A destination the follower rejected earlier is transient:
            // re-issue it rather than failing.
            if let Some(desired) = member.desired_position {
                if !follower.has_path() {
                    follower.set_destination(desired);
                }
            }
            if state == GroupState::MoveToFormation && follower.has_arrived() {
                member.rotate_toward(follower, direction, clock.dt_secs());
            }
        }

        if is_leader {
            self.run_leader(group_id, nav, clock);
        }

        // Own stuck tracking runs after the leader scan: the leader acts on
        // it one tick later.
        {
            let Some(member) = self.members.get_mut(&agent) else {
                return TickStatus::Failed;
            };
            let Some(follower) = nav.follower_mut(agent) else {
                return TickStatus::Failed;
            };
            let path_active = follower.has_path() && !follower.has_arrived();
            member.stuck.update(
                path_active,
                follower.velocity().length(),
                clock,
                member.config.stuck_duration_secs,
            );
        }

        TickStatus::Running
    }

    // ── Leader-only group transitions ─────────────────────────────────────

    fn run_leader(&mut self, group_id: GroupId, nav: &mut dyn NavAccess, clock: &SimClock) {
        let Self { groups, members } = self;
        let Some(group) = groups.get_mut(&group_id) else {
            return;
        };

        match group.state {
            // Wait out the settling delay, then fix geometry and assign
            // slots.
            GroupState::Initialized => {
                let Some(leader) = members.get(&group.leader) else {
                    return;
                };
                if clock.secs_since(group.start_tick) < leader.config.start_delay_secs {
                    return;
                }
                let orientation = leader.config.orientation;
                let target = leader.config.target;
                let Some(follower) = nav.follower_mut(group.leader) else {
                    return;
                };
                let anchor = follower.position();
                group.direction = match orientation {
                    OrientationMode::FacingAtStart => follower.facing().normalized_or(Vec3::Z),
                    OrientationMode::MovementDirection => {
                        (target - anchor).normalized_or(follower.facing())
                    }
                    OrientationMode::Explicit { direction } => direction.normalized_or(Vec3::Z),
                };
                group.target_position = anchor;
                group.set_state(GroupState::MoveToFormation);
                assign_slots(group, members, nav);
            }

            // Depart once everyone is parked (where the shape permits
            // pre-positioning) and rotated into the group direction.
            GroupState::MoveToFormation => {
                let Some(leader) = members.get(&group.leader) else {
                    return;
                };
                let target = leader.config.target;
                let pre_position = leader.shape.allows_pre_formation_movement();

                let mut stuck_member = None;
                let mut ready = true;
                for &aid in &group.members {
                    let Some(member) = members.get(&aid) else {
                        continue;
                    };
                    if member.stuck.is_stuck {
                        stuck_member = Some(aid);
                        break;
                    }
                    let Some(follower) = nav.follower_mut(aid) else {
                        continue;
                    };
                    if pre_position && !follower.has_arrived() {
                        ready = false;
                    }
                    if !member.rotation_complete(follower.facing(), group.direction) {
                        ready = false;
                    }
                }
                if let Some(aid) = stuck_member {
                    log::warn!("group {group_id}: {aid} stuck while forming");
                    group.set_state(GroupState::Failure);
                    return;
                }
                if !ready {
                    return;
                }

                group.target_position = target;
                group.set_state(GroupState::MoveToTarget);
                // Push fresh, terrain-snapped destinations to everyone.
                let group = &*group;
                for i in 0..group.members.len() {
                    let aid = group.members[i];
                    let Some(member) = members.get_mut(&aid) else {
                        continue;
                    };
                    if !member.slot.is_valid() {
                        continue;
                    }
                    let Some(follower) = nav.follower_mut(aid) else {
                        continue;
                    };
                    member.refresh_destination(group, follower, None, true);
                }
            }

            // Watch for stuck members, keep the group cohesive, and finish
            // when everyone has arrived.
            GroupState::MoveToTarget => {
                let stuck_member = group
                    .members
                    .iter()
                    .copied()
                    .find(|aid| members.get(aid).is_some_and(|m| m.stuck.is_stuck));
                if let Some(aid) = stuck_member {
                    log::warn!("group {group_id}: {aid} stuck en route");
                    group.set_state(GroupState::Failure);
                    return;
                }

                let mut all_arrived = true;
                for &aid in &group.members {
                    let arrived = nav
                        .follower_mut(aid)
                        .map(|f| f.has_arrived())
                        .unwrap_or(true);
                    if !arrived {
                        all_arrived = false;
                        break;
                    }
                }
                if all_arrived {
                    group.set_state(GroupState::Arrived);
                    return;
                }

                // Cohesion: every unarrived member's distance to its own
                // slot is measured against the reference member's, with
                // asymmetric enter/leave deltas so the flag cannot flap.
                let Some(reference) = group.first_follower() else {
                    return; // a group of one has nothing to cohere with
                };
                let reference_dist = {
                    let Some(follower) = nav.follower_mut(reference) else {
                        return;
                    };
                    let at = follower.position();
                    members
                        .get(&reference)
                        .and_then(|m| m.desired_position)
                        .map(|d| at.distance(d))
                        .unwrap_or(0.0)
                };

                let mut changed = false;
                for i in 0..group.members.len() {
                    let aid = group.members[i];
                    let Some(follower) = nav.follower_mut(aid) else {
                        continue;
                    };
                    if follower.has_arrived() {
                        continue;
                    }
                    let at = follower.position();
                    let Some(member) = members.get_mut(&aid) else {
                        continue;
                    };
                    let Some(desired) = member.desired_position else {
                        continue;
                    };
                    let dist = at.distance(desired);
                    let delta = if member.out_of_range {
                        member.config.in_range_delta
                    } else {
                        member.config.out_of_range_delta
                    };
                    let out = dist > reference_dist + delta;
                    if out != member.out_of_range {
                        member.out_of_range = out;
                        changed = true;
                    }
                }

                let any_out = group
                    .members
                    .iter()
                    .any(|aid| members.get(aid).is_some_and(|m| m.out_of_range));
                if changed || any_out != group.any_out_of_range {
                    group.any_out_of_range = any_out;
                    apply_catch_up(group, members, nav);
                }
            }

            // Terminal states never reach here: tick() short-circuits first.
            GroupState::Arrived | GroupState::Failure => {}
        }
    }
}

fn get_or_create(
    groups: &mut Map<GroupId, FormationGroup>,
    id: GroupId,
    now: Tick,
) -> &mut FormationGroup {
    groups.entry(id).or_insert_with(|| {
        log::debug!("group {id}: created");
        FormationGroup::new(id, now)
    })
}

/// Reapply the catch-up speed policy to every member (idempotent).
///
/// Factor > 1: an out-of-range member speeds itself up, everyone else keeps
/// their original speed.  Factor ≤ 1: while any member is out of range,
/// every in-range member slows to the factor; restored once none are.
fn apply_catch_up(group: &FormationGroup, members: &mut MemberMap, nav: &mut dyn NavAccess) {
    for &aid in &group.members {
        let Some(member) = members.get(&aid) else {
            continue;
        };
        let Some(follower) = nav.follower_mut(aid) else {
            continue;
        };
        let factor = member.config.catch_up_factor;
        let speed = if factor > 1.0 {
            if member.out_of_range {
                member.original_speed * factor
            } else {
                member.original_speed
            }
        } else if group.any_out_of_range && !member.out_of_range {
            member.original_speed * factor
        } else {
            member.original_speed
        };
        follower.set_speed(speed);
    }
}
