//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  `SimClock` holds the
//! mapping to wall time:
//!
//!   elapsed_secs = tick * tick_duration_ms / 1000
//!
//! Using an integer tick as the canonical time unit keeps delay and timeout
//! arithmetic exact (no floating-point drift across long runs); seconds only
//! appear at the configuration boundary, where humans write them.
//!
//! The default tick duration is 50 ms (20 Hz), the usual decision rate for
//! steering-level agent control.  Hosts that tick faster or slower set
//! `tick_duration_ms` accordingly; the rest of the framework is agnostic.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64`: at 20 Hz a u64 lasts ~29 billion years, so overflow is
/// not a practical concern.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and elapsed seconds.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many milliseconds one tick represents.  Default: 50 (20 Hz).
    pub tick_duration_ms: u32,
    /// The current tick — advanced by [`SimClock::advance`] each iteration.
    pub current_tick: Tick,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(50)
    }
}

impl SimClock {
    /// Create a clock at tick 0 with the given resolution.
    pub fn new(tick_duration_ms: u32) -> Self {
        Self {
            tick_duration_ms,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Seconds represented by a single tick.
    #[inline]
    pub fn dt_secs(&self) -> f32 {
        self.tick_duration_ms as f32 / 1000.0
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.current_tick.0 as f32 * self.dt_secs()
    }

    /// Seconds elapsed from `earlier` to the current tick.
    #[inline]
    pub fn secs_since(&self, earlier: Tick) -> f32 {
        self.current_tick.since(earlier) as f32 * self.dt_secs()
    }

    /// How many ticks span `secs` seconds? (rounds up — a timeout never
    /// fires early)
    #[inline]
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        ((secs * 1000.0) / self.tick_duration_ms as f32).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.elapsed_secs())
    }
}
