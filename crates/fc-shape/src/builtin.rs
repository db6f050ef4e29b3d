//! Built-in formation patterns.
//!
//! All patterns are parametrized trigonometry over `(slot, count, center,
//! forward)`.  Constructors take world-unit spacing/radius parameters and
//! fall back to sane defaults via `Default`.

use fc_core::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::shape::{lateral, SlotShape};

/// 64-bit fractional golden-ratio constant for per-slot seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── Line ──────────────────────────────────────────────────────────────────────

/// Members abreast, centered on the group center, facing forward.
#[derive(Debug, Clone, Copy)]
pub struct Line {
    pub spacing: f32,
}

impl Default for Line {
    fn default() -> Self {
        Self { spacing: 2.0 }
    }
}

impl SlotShape for Line {
    fn slot_position(&self, slot: usize, count: usize, center: Vec3, forward: Vec3, _snap: bool) -> Vec3 {
        let offset = (slot as f32 - (count.saturating_sub(1)) as f32 * 0.5) * self.spacing;
        center + lateral(forward) * offset
    }

    fn name(&self) -> &'static str {
        "line"
    }
}

// ── Column ────────────────────────────────────────────────────────────────────

/// Single file behind the group center.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub spacing: f32,
}

impl Default for Column {
    fn default() -> Self {
        Self { spacing: 2.0 }
    }
}

impl SlotShape for Column {
    fn slot_position(&self, slot: usize, _count: usize, center: Vec3, forward: Vec3, _snap: bool) -> Vec3 {
        center - forward * (slot as f32 * self.spacing)
    }

    fn name(&self) -> &'static str {
        "column"
    }
}

// ── Circle ────────────────────────────────────────────────────────────────────

/// Evenly spaced ring around the center; slot 0 sits on the forward axis.
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub radius: f32,
}

impl Default for Circle {
    fn default() -> Self {
        Self { radius: 4.0 }
    }
}

impl SlotShape for Circle {
    fn slot_position(&self, slot: usize, count: usize, center: Vec3, forward: Vec3, _snap: bool) -> Vec3 {
        let step = std::f32::consts::TAU / count.max(1) as f32;
        let angle = slot as f32 * step;
        let (sin, cos) = angle.sin_cos();
        center + forward * (cos * self.radius) + lateral(forward) * (sin * self.radius)
    }

    fn name(&self) -> &'static str {
        "circle"
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Rows of `columns` members, filling row by row behind the center.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    pub columns: usize,
    pub spacing: f32,
}

impl Default for Grid {
    fn default() -> Self {
        Self { columns: 3, spacing: 2.0 }
    }
}

impl SlotShape for Grid {
    fn slot_position(&self, slot: usize, _count: usize, center: Vec3, forward: Vec3, _snap: bool) -> Vec3 {
        let columns = self.columns.max(1);
        let row = slot / columns;
        let col = slot % columns;
        let side = (col as f32 - (columns - 1) as f32 * 0.5) * self.spacing;
        center - forward * (row as f32 * self.spacing) + lateral(forward) * side
    }

    fn name(&self) -> &'static str {
        "grid"
    }
}

// ── Wedge ─────────────────────────────────────────────────────────────────────

/// A V with slot 0 at the apex, later slots trailing alternately left and
/// right.
#[derive(Debug, Clone, Copy)]
pub struct Wedge {
    pub spacing: f32,
    /// Half-angle of the V in degrees.
    pub half_angle_deg: f32,
}

impl Default for Wedge {
    fn default() -> Self {
        Self { spacing: 2.0, half_angle_deg: 30.0 }
    }
}

impl SlotShape for Wedge {
    fn slot_position(&self, slot: usize, _count: usize, center: Vec3, forward: Vec3, _snap: bool) -> Vec3 {
        if slot == 0 {
            return center;
        }
        let rank = slot.div_ceil(2) as f32;
        let side = if slot % 2 == 1 { 1.0 } else { -1.0 };
        let (sin, cos) = self.half_angle_deg.to_radians().sin_cos();
        let reach = rank * self.spacing;
        center - forward * (reach * cos) + lateral(forward) * (side * reach * sin)
    }

    fn name(&self) -> &'static str {
        "wedge"
    }
}

// ── Scatter ───────────────────────────────────────────────────────────────────

/// Randomized placement inside a disc around the center.
///
/// Placement is deterministic per `(seed, slot)`: each slot seeds its own
/// `SmallRng` with golden-ratio mixing, so repeated queries for the same
/// slot agree and slots never collapse onto each other statistically.
/// Because positions carry no order, proximity assignment buys nothing —
/// the shape declines it.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    pub radius: f32,
    pub seed: u64,
}

impl Default for Scatter {
    fn default() -> Self {
        Self { radius: 5.0, seed: 0 }
    }
}

impl SlotShape for Scatter {
    fn slot_position(&self, slot: usize, _count: usize, center: Vec3, forward: Vec3, _snap: bool) -> Vec3 {
        let mut rng =
            SmallRng::seed_from_u64(self.seed ^ (slot as u64).wrapping_mul(MIXING_CONSTANT));
        // Uniform over the disc: sqrt-distributed radius, uniform angle.
        let r = self.radius * rng.gen_range(0.0f32..1.0).sqrt();
        let angle = rng.gen_range(0.0f32..std::f32::consts::TAU);
        let (sin, cos) = angle.sin_cos();
        center + forward * (cos * r) + lateral(forward) * (sin * r)
    }

    fn allows_optimal_assignment(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "scatter"
    }
}
