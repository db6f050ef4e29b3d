//! Slot assignment.
//!
//! Two regimes, chosen by the leader's shape:
//!
//! - **Membership order**: member *i* takes slot *i*.  Used when the shape
//!   declines proximity matching (randomized or order-independent
//!   placements).
//! - **Greedy nearest-slot**: every candidate slot position is precomputed,
//!   then each member in membership order claims the closest remaining one.
//!   O(N²) and deterministic for a fixed membership order and fixed
//!   positions.  This is a heuristic, **not** a min-cost perfect matching —
//!   an early member can take a slot a later member was closer to.  For
//!   formation sizes (tens of agents) the difference is cosmetic and the
//!   predictability is worth more than optimality.

use std::sync::Arc;

use fc_core::{SlotId, Vec3};
use fc_nav::NavAccess;

use crate::engine::MemberMap;
use crate::FormationGroup;

/// Assign a slot to every member of `group` and push pre-formation
/// destinations where the shape allows moving into the pattern early.
pub(crate) fn assign_slots(
    group: &mut FormationGroup,
    members: &mut MemberMap,
    nav: &mut dyn NavAccess,
) {
    let Some(leader) = members.get(&group.leader) else {
        return;
    };
    let shape = Arc::clone(&leader.shape);
    let pre_position = shape.allows_pre_formation_movement();
    let count = group.member_count();
    let group = &*group; // geometry is read-only from here on

    if !shape.allows_optimal_assignment() {
        for (i, &agent) in group.members.iter().enumerate() {
            let Some(member) = members.get_mut(&agent) else {
                continue;
            };
            member.slot = SlotId::try_from(i).unwrap_or(SlotId::INVALID);
            if pre_position {
                if let Some(follower) = nav.follower_mut(agent) {
                    member.refresh_destination(group, follower, None, false);
                }
            }
        }
        return;
    }

    // Candidate positions for every slot, computed once (without terrain
    // snapping — the group has not started moving yet).
    let slots: Vec<Vec3> = (0..count)
        .map(|i| {
            shape.slot_position(i, count, group.target_position, group.direction, false)
        })
        .collect();
    let mut unassigned: Vec<usize> = (0..count).collect();

    for &agent in &group.members {
        let Some(follower) = nav.follower_mut(agent) else {
            continue;
        };
        let at = follower.position();
        let Some(pick) = nearest_slot(&slots, &unassigned, at) else {
            break;
        };
        unassigned.retain(|&s| s != pick);

        let Some(member) = members.get_mut(&agent) else {
            continue;
        };
        member.slot = SlotId::try_from(pick).unwrap_or(SlotId::INVALID);
        if pre_position {
            // Pass the precomputed position along to skip a shape query.
            member.refresh_destination(group, follower, Some(slots[pick]), false);
        }
    }
}

/// The unassigned slot whose position is closest to `at`.
fn nearest_slot(slots: &[Vec3], unassigned: &[usize], at: Vec3) -> Option<usize> {
    unassigned
        .iter()
        .copied()
        .min_by(|&a, &b| slots[a].distance_sq(at).total_cmp(&slots[b].distance_sq(at)))
}
