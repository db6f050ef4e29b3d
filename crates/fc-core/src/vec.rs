//! 3D vector type and rotation utilities.
//!
//! `Vec3` uses `f32` components.  Formation geometry tolerates centimetre
//! error at world scale, so single precision halves memory against `f64`
//! and matches what path-following middleware exposes.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Squared-length threshold below which a vector cannot be normalized.
const NORMALIZE_EPS: f32 = 1e-12;

/// A 3D world-space vector (or point) stored as single-precision floats.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const X: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    #[inline]
    pub fn distance_sq(self, other: Vec3) -> f32 {
        (other - self).length_sq()
    }

    /// Unit vector in the same direction, or `None` for (near-)zero vectors.
    pub fn try_normalized(self) -> Option<Vec3> {
        let len_sq = self.length_sq();
        if len_sq < NORMALIZE_EPS {
            return None;
        }
        Some(self * (1.0 / len_sq.sqrt()))
    }

    /// Unit vector in the same direction, or `fallback` for (near-)zero vectors.
    #[inline]
    pub fn normalized_or(self, fallback: Vec3) -> Vec3 {
        self.try_normalized().unwrap_or(fallback)
    }

    /// Unsigned angle to `other` in radians, in `[0, π]`.
    ///
    /// Returns `0.0` if either vector is (near-)zero.
    pub fn angle_to(self, other: Vec3) -> f32 {
        match (self.try_normalized(), other.try_normalized()) {
            (Some(a), Some(b)) => a.dot(b).clamp(-1.0, 1.0).acos(),
            _ => 0.0,
        }
    }

    /// Rotate this direction toward `target` by at most `max_angle` radians.
    ///
    /// Both inputs are treated as directions (magnitude ignored); the result
    /// is a unit vector.  If the angular difference is within `max_angle` the
    /// target direction is returned exactly, so iterated calls converge
    /// rather than oscillate.  Anti-parallel inputs rotate through an
    /// arbitrary perpendicular axis.
    pub fn rotate_towards(self, target: Vec3, max_angle: f32) -> Vec3 {
        let from = match self.try_normalized() {
            Some(v) => v,
            None => return target.normalized_or(Vec3::Z),
        };
        let to = match target.try_normalized() {
            Some(v) => v,
            None => return from,
        };

        let angle = from.angle_to(to);
        if angle <= max_angle {
            return to;
        }

        let axis = from
            .cross(to)
            .try_normalized()
            .unwrap_or_else(|| from.any_perpendicular());

        // Rodrigues rotation of `from` around `axis` by `max_angle`.
        let (sin, cos) = max_angle.sin_cos();
        (from * cos + axis.cross(from) * sin + axis * (axis.dot(from) * (1.0 - cos)))
            .normalized_or(to)
    }

    /// Linear interpolation: `self` at `t = 0`, `other` at `t = 1`.
    #[inline]
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }

    /// Some unit vector perpendicular to `self` (which must be non-zero).
    fn any_perpendicular(self) -> Vec3 {
        // Cross with whichever axis is least aligned to avoid degeneracy.
        let axis = if self.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        self.cross(axis).normalized_or(Vec3::Y)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}
