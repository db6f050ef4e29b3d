//! Save-and-resume records.
//!
//! Snapshots are plain tagged records with a stable schema — a host can
//! serialize them with any serde format and restore them into a freshly
//! re-joined engine.  The group's shared state rides along with its leader's
//! record, so saving every member captures the whole group exactly once.
//!
//! # Restore protocol
//!
//! Hosts re-run the normal join sequence first (members exist, slots
//! unassigned), then call [`FormationEngine::load_member`] per agent —
//! followers before the leader, so the leader's embedded slot list validates
//! against fully restored members.

use fc_core::{AgentId, FcError, FcResult, GroupState, SimClock, SlotId, Tick, Vec3};
use fc_nav::NavAccess;
use serde::{Deserialize, Serialize};

use crate::{FormationEngine, StuckDetector};

// ── Records ───────────────────────────────────────────────────────────────────

/// One member's persisted coordination state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub slot: SlotId,
    pub desired_position: Option<Vec3>,
    pub out_of_range: bool,
    pub is_stuck: bool,
    pub blocked_ticks: u64,
    pub original_speed: f32,
    /// The follower's in-flight destination, captured only while a path was
    /// active and unarrived; re-issued on load.
    pub destination: Option<Vec3>,
}

/// The group-level state embedded in the leader's snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub state: GroupState,
    pub target_position: Vec3,
    pub direction: Vec3,
    /// Ticks elapsed since the group's `start_tick` at save time; subtracted
    /// from "now" on load so the settling delay resumes mid-count.
    pub elapsed_ticks: u64,
    /// The full slot layout in membership order, kept for post-load
    /// validation.
    pub slots: Vec<(AgentId, SlotId)>,
}

/// A member's snapshot; the leader variant carries the group's state too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum MemberSnapshot {
    Follower { member: MemberRecord },
    Leader { member: MemberRecord, group: GroupRecord },
}

// ── Capture / restore ─────────────────────────────────────────────────────────

impl FormationEngine {
    /// Capture `agent`'s coordination state (plus the group's, if `agent`
    /// leads it).  `None` when `agent` is not a member of a live group.
    pub fn save_member(
        &self,
        agent: AgentId,
        nav: &mut dyn NavAccess,
        clock: &SimClock,
    ) -> Option<MemberSnapshot> {
        let member = self.members.get(&agent)?;
        let group = self.groups.get(&member.group)?;

        let mut record = MemberRecord {
            slot: member.slot,
            desired_position: member.desired_position,
            out_of_range: member.out_of_range,
            is_stuck: member.stuck.is_stuck,
            blocked_ticks: member.stuck.blocked_ticks,
            original_speed: member.original_speed,
            destination: None,
        };
        if let Some(follower) = nav.follower_mut(agent) {
            if follower.has_path() && !follower.has_arrived() {
                record.destination = follower.destination();
            }
        }

        if group.is_leader(agent) {
            Some(MemberSnapshot::Leader {
                member: record,
                group: GroupRecord {
                    state: group.state,
                    target_position: group.target_position,
                    direction: group.direction,
                    elapsed_ticks: clock.current_tick.since(group.start_tick),
                    slots: group
                        .members
                        .iter()
                        .map(|&a| {
                            let slot = self
                                .members
                                .get(&a)
                                .map(|m| m.slot)
                                .unwrap_or(SlotId::INVALID);
                            (a, slot)
                        })
                        .collect(),
                },
            })
        } else {
            Some(MemberSnapshot::Follower { member: record })
        }
    }

    /// Restore `agent` from `snapshot`.
    ///
    /// The agent must already be a member again (hosts rejoin before
    /// loading).  Fields are restored verbatim; a saved destination is
    /// re-issued to the follower.  A leader snapshot additionally restores
    /// the group and rewinds `start_tick` by the saved elapsed time.  Slot
    /// layout mismatches are logged as warnings, not errors — the host may
    /// legitimately have changed the roster since the save.
    pub fn load_member(
        &mut self,
        agent: AgentId,
        snapshot: MemberSnapshot,
        nav: &mut dyn NavAccess,
        clock: &SimClock,
    ) -> FcResult<()> {
        let (record, group_record) = match snapshot {
            MemberSnapshot::Follower { member } => (member, None),
            MemberSnapshot::Leader { member, group } => (member, Some(group)),
        };

        let group_id = {
            let Some(member) = self.members.get_mut(&agent) else {
                return Err(FcError::NotAMember(agent));
            };
            member.slot = record.slot;
            member.desired_position = record.desired_position;
            member.out_of_range = record.out_of_range;
            member.stuck = StuckDetector {
                is_stuck: record.is_stuck,
                blocked_ticks: record.blocked_ticks,
            };
            member.original_speed = record.original_speed;
            member.group
        };

        if let Some(destination) = record.destination {
            if let Some(follower) = nav.follower_mut(agent) {
                follower.set_destination(destination);
            }
        }

        let Some(group_record) = group_record else {
            return Ok(());
        };
        let Some(group) = self.groups.get_mut(&group_id) else {
            return Err(FcError::GroupNotFound(group_id));
        };
        if !group.is_leader(agent) {
            log::warn!(
                "group {group_id}: snapshot leader {agent} is not the live leader {}",
                group.leader
            );
        }
        group.state = group_record.state;
        group.target_position = group_record.target_position;
        group.direction = group_record.direction;
        group.start_tick = Tick(
            clock
                .current_tick
                .0
                .saturating_sub(group_record.elapsed_ticks),
        );

        // Post-load validation of the saved slot layout.
        for (aid, slot) in &group_record.slots {
            match self.members.get(aid) {
                Some(m) if m.slot == *slot => {}
                Some(m) => log::warn!(
                    "group {group_id}: {aid} restored slot {} differs from saved {}",
                    m.slot,
                    slot
                ),
                None => log::warn!(
                    "group {group_id}: saved member {aid} is not present after load"
                ),
            }
        }
        Ok(())
    }
}
