//! Per-member behavior configuration.
//!
//! Typically loaded from a TOML/JSON file by the application crate; all
//! fields have working defaults.  `validate()` is called at join time —
//! an invalid configuration is a hard error that disables the member, never
//! a silently clamped value.

use fc_core::{FcError, FcResult, Vec3};
use serde::{Deserialize, Serialize};

/// How a group chooses its facing when it leaves `Initialized`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OrientationMode {
    /// Use the leader's facing at the moment the group starts.
    FacingAtStart,
    /// Face from the leader's position toward the task target.
    MovementDirection,
    /// Use a fixed, explicitly configured direction.
    Explicit { direction: Vec3 },
}

/// Configuration for one formation member.
///
/// The leader's copy additionally governs group-level choices: the task
/// target, the orientation mode, and the settling delay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberConfig {
    /// The task's true target position the group ultimately moves to.
    pub target: Vec3,

    /// How the group direction is derived (leader's setting wins).
    pub orientation: OrientationMode,

    /// Claim leadership on join, displacing a non-forced leader.
    pub forced_leader: bool,

    /// Seconds the group idles in `Initialized` before slots are assigned.
    pub start_delay_secs: f32,

    /// Angular rate (deg/s) at which this member turns into the group
    /// direction once parked on its slot.
    pub rotation_speed_deg: f32,

    /// Angular difference (deg) below which rotation counts as finished.
    pub rotation_threshold_deg: f32,

    /// Slack (world units) beyond the reference member's slot distance at
    /// which this member becomes out-of-range.
    pub out_of_range_delta: f32,

    /// The narrower slack an out-of-range member must get back under before
    /// it counts as in-range again.  Must be strictly less than
    /// `out_of_range_delta` — the asymmetry is what prevents flag flapping.
    pub in_range_delta: f32,

    /// Speed multiplier of the catch-up policy.  `> 1`: an out-of-range
    /// member speeds itself up.  `≤ 1`: every in-range member slows to this
    /// multiple while anyone is out of range.
    pub catch_up_factor: f32,

    /// Seconds of near-zero velocity on an active, unarrived path before
    /// the member counts as stuck (which fails the whole group).
    pub stuck_duration_secs: f32,

    /// If this member is the leader when it is removed, fail the group
    /// instead of passing leadership on.
    pub fail_on_removal: bool,

    /// Compact slot indices when this member is removed, shifting later
    /// slots down and refreshing their destinations.
    pub reindex_on_removal: bool,
}

impl Default for MemberConfig {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            orientation: OrientationMode::FacingAtStart,
            forced_leader: false,
            start_delay_secs: 0.5,
            rotation_speed_deg: 120.0,
            rotation_threshold_deg: 5.0,
            out_of_range_delta: 1.0,
            in_range_delta: 0.5,
            catch_up_factor: 0.5,
            stuck_duration_secs: 2.0,
            fail_on_removal: false,
            reindex_on_removal: true,
        }
    }
}

impl MemberConfig {
    /// Reject configurations the engine cannot run correctly.
    pub fn validate(&self) -> FcResult<()> {
        if self.in_range_delta < 0.0 {
            return Err(FcError::Config(format!(
                "in_range_delta must be non-negative, got {}",
                self.in_range_delta
            )));
        }
        if self.out_of_range_delta <= self.in_range_delta {
            return Err(FcError::Config(format!(
                "out_of_range_delta ({}) must exceed in_range_delta ({})",
                self.out_of_range_delta, self.in_range_delta
            )));
        }
        if self.rotation_speed_deg <= 0.0 {
            return Err(FcError::Config(format!(
                "rotation_speed_deg must be positive, got {}",
                self.rotation_speed_deg
            )));
        }
        if self.rotation_threshold_deg < 0.0 {
            return Err(FcError::Config(format!(
                "rotation_threshold_deg must be non-negative, got {}",
                self.rotation_threshold_deg
            )));
        }
        if self.catch_up_factor <= 0.0 {
            return Err(FcError::Config(format!(
                "catch_up_factor must be positive, got {}",
                self.catch_up_factor
            )));
        }
        if self.stuck_duration_secs <= 0.0 {
            return Err(FcError::Config(format!(
                "stuck_duration_secs must be positive, got {}",
                self.stuck_duration_secs
            )));
        }
        if self.start_delay_secs < 0.0 {
            return Err(FcError::Config(format!(
                "start_delay_secs must be non-negative, got {}",
                self.start_delay_secs
            )));
        }
        if let OrientationMode::Explicit { direction } = self.orientation {
            if direction.try_normalized().is_none() {
                return Err(FcError::Config(
                    "explicit orientation direction must be non-zero".into(),
                ));
            }
        }
        Ok(())
    }
}
