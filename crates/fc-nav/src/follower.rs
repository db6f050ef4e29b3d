//! The `PathFollower` trait — the navigation seam of the framework.
//!
//! # Pluggability
//!
//! The formation engine drives agents exclusively through this trait, so
//! hosts can back it with any navigation middleware (a navmesh agent, a
//! steering controller, a physics character body) without touching the
//! coordination core.  [`KinematicFollower`][crate::KinematicFollower] is
//! the shipped default for hosts without one.
//!
//! # Contract notes
//!
//! - `set_destination` may reject a position (no path found, off-mesh, mid
//!   repath).  The engine treats rejection as transient and re-issues the
//!   destination on the member's next tick.
//! - `sample_position` snaps a candidate position onto traversable terrain
//!   and returns `false` when nothing valid is nearby; the input is left
//!   unchanged in that case.
//! - `facing`/`set_facing` expose the agent's orientation.  Followers that
//!   auto-rotate toward their velocity should still honor `set_facing` while
//!   stationary — formation members align to the group direction after
//!   arriving at their slot.

use fc_core::Vec3;

/// Per-agent velocity/destination/arrival primitives, consumed by the
/// formation engine.
///
/// All methods are object-safe; the engine only ever sees
/// `&mut dyn PathFollower` handed out by a [`NavAccess`][crate::NavAccess].
pub trait PathFollower {
    /// Current world position of the agent.
    fn position(&self) -> Vec3;

    /// Current facing direction (unit vector).
    fn facing(&self) -> Vec3;

    /// Orient the agent to face `direction` (treated as a direction; the
    /// implementation normalizes).
    fn set_facing(&mut self, direction: Vec3);

    /// Instantaneous velocity.  Near-zero magnitude with an active path is
    /// the engine's stuck signal.
    fn velocity(&self) -> Vec3;

    /// Distance still to travel along the current path; `0.0` without one.
    fn remaining_distance(&self) -> f32;

    /// The position currently being moved toward, if any.
    fn destination(&self) -> Option<Vec3>;

    /// Current movement speed.
    fn speed(&self) -> f32;

    /// Set movement speed (used by the catch-up policy).
    fn set_speed(&mut self, speed: f32);

    /// Begin moving toward `pos`.  Returns `false` if the follower cannot
    /// accept the destination right now.
    fn set_destination(&mut self, pos: Vec3) -> bool;

    /// `true` while a destination is set (arrived or not).
    fn has_path(&self) -> bool;

    /// `true` once the current destination has been reached, or when there
    /// is no destination at all.
    fn has_arrived(&self) -> bool;

    /// Snap `pos` onto valid traversable terrain near its current value.
    /// Returns `false` (leaving `pos` unchanged) if none is found nearby.
    fn sample_position(&self, pos: &mut Vec3) -> bool;

    /// Abandon the current path and halt.
    fn stop(&mut self);
}
