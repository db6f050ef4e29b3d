//! Straight-line kinematic reference follower.
//!
//! `KinematicFollower` models an agent on an open, unobstructed plane: it
//! moves toward its destination in a straight line at constant speed and
//! stops inside `arrive_radius`.  There is no pathfinding and no collision.
//! It exists so hosts and tests can run the engine without navigation
//! middleware; production hosts implement [`PathFollower`] over theirs.

use fc_core::Vec3;

use crate::PathFollower;

// ── Motion ────────────────────────────────────────────────────────────────────

/// Followers whose movement is integrated in-process by the host tick loop.
///
/// Real navigation middleware advances agents itself; implementations of
/// this trait are advanced by the executor calling [`integrate`][Self::integrate]
/// once per tick, before any member controller runs.
pub trait Motion {
    /// Advance the follower's motion by `dt_secs` seconds.
    fn integrate(&mut self, dt_secs: f32);
}

// ── KinematicFollower ─────────────────────────────────────────────────────────

/// A constant-speed, straight-line [`PathFollower`] on an open plane.
///
/// All fields are public: tests reposition agents and toggle `obstructed`
/// directly, the same way hosts would mirror external state in.
#[derive(Debug, Clone)]
pub struct KinematicFollower {
    pub position: Vec3,
    pub facing: Vec3,
    pub speed: f32,
    /// Distance from the destination at which the agent counts as arrived.
    pub arrive_radius: f32,
    pub destination: Option<Vec3>,
    pub velocity: Vec3,
    /// While `true` the agent cannot move: velocity stays zero even with an
    /// active path.  Stands in for a blocked corridor or a broken path.
    pub obstructed: bool,
}

impl KinematicFollower {
    pub fn new(position: Vec3, facing: Vec3, speed: f32) -> Self {
        Self {
            position,
            facing: facing.normalized_or(Vec3::Z),
            speed,
            arrive_radius: 0.05,
            destination: None,
            velocity: Vec3::ZERO,
            obstructed: false,
        }
    }

    /// Builder-style override of the arrival radius.
    pub fn with_arrive_radius(mut self, radius: f32) -> Self {
        self.arrive_radius = radius;
        self
    }
}

impl Motion for KinematicFollower {
    fn integrate(&mut self, dt_secs: f32) {
        self.velocity = Vec3::ZERO;
        if self.obstructed || dt_secs <= 0.0 {
            return;
        }
        let Some(dest) = self.destination else { return };

        let offset = dest - self.position;
        let dist = offset.length();
        if dist <= self.arrive_radius {
            return;
        }

        let step = self.speed * dt_secs;
        let before = self.position;
        if step >= dist {
            self.position = dest;
        } else if let Some(dir) = offset.try_normalized() {
            self.position += dir * step;
        }
        self.velocity = (self.position - before) * (1.0 / dt_secs);
    }
}

impl PathFollower for KinematicFollower {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn facing(&self) -> Vec3 {
        self.facing
    }

    fn set_facing(&mut self, direction: Vec3) {
        self.facing = direction.normalized_or(self.facing);
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn remaining_distance(&self) -> f32 {
        match self.destination {
            Some(dest) => self.position.distance(dest),
            None => 0.0,
        }
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn set_destination(&mut self, pos: Vec3) -> bool {
        self.destination = Some(pos);
        true
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
    }

    fn has_arrived(&self) -> bool {
        match self.destination {
            Some(dest) => self.position.distance(dest) <= self.arrive_radius,
            None => true,
        }
    }

    fn sample_position(&self, _pos: &mut Vec3) -> bool {
        // Open plane: every position is traversable as-is.
        true
    }

    fn stop(&mut self) {
        self.destination = None;
        self.velocity = Vec3::ZERO;
    }
}
