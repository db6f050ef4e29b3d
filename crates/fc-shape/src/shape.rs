//! The `SlotShape` strategy trait.
//!
//! # Pluggability
//!
//! The engine computes every desired member position through this trait, so
//! applications register custom patterns without touching the coordination
//! core.  Implementations must be pure: the same inputs always yield the
//! same position, because the greedy assignment precomputes candidate slots
//! and hands them back to the engine later.

use fc_core::Vec3;

/// A formation pattern: maps a slot index to a world position.
///
/// # Thread safety
///
/// Shapes are shared between members as `Arc<dyn SlotShape>`, so
/// implementations must be `Send + Sync`.
pub trait SlotShape: Send + Sync + 'static {
    /// Desired world position for `slot` of `count` total members, for a
    /// formation centered at `center` facing `forward` (unit vector).
    ///
    /// `snap_to_terrain` is set once the group is moving toward its real
    /// target; terrain-aware shapes may use it to bias placement.  Analytic
    /// shapes ignore it — the engine separately snaps results through
    /// `PathFollower::sample_position` when the flag is set.
    fn slot_position(
        &self,
        slot: usize,
        count: usize,
        center: Vec3,
        forward: Vec3,
        snap_to_terrain: bool,
    ) -> Vec3;

    /// Whether slots should be matched to members by proximity (greedy
    /// nearest-slot assignment).  Shapes whose placement is inherently
    /// order-independent or randomized return `false` and get strict
    /// membership-order assignment instead.
    fn allows_optimal_assignment(&self) -> bool {
        true
    }

    /// Whether members may move into the pattern before the group departs
    /// for its target.  When `false`, members hold position (rotating only)
    /// during `MoveToFormation`.
    fn allows_pre_formation_movement(&self) -> bool {
        true
    }

    /// Stable registry name for this shape.
    fn name(&self) -> &'static str;
}

/// The lateral (right-hand) direction for a formation facing `forward`.
///
/// Degenerates gracefully: a vertical or zero `forward` falls back to +X.
#[inline]
pub(crate) fn lateral(forward: Vec3) -> Vec3 {
    forward.cross(Vec3::Y).normalized_or(Vec3::X)
}
