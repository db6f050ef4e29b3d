//! `fc-sim` — the host task executor for formation members.
//!
//! The coordination core never runs itself: an executor calls each member's
//! per-tick hook and interprets its ternary result.  `FormationExec` is that
//! executor for in-process hosts (simulations, tests, demos): it owns the
//! follower arena, integrates motion, ticks every active member in ascending
//! id order, and reports progress through observer hooks.
//!
//! # Crate layout
//!
//! | Module       | Contents                                            |
//! |--------------|-----------------------------------------------------|
//! | [`executor`] | `FormationExec`, `ExecConfig`                       |
//! | [`observer`] | `ExecObserver`, `NoopObserver`                      |
//! | [`trace`]    | `TraceRow`, `CsvTrace` — per-snapshot CSV output    |
//! | [`error`]    | `SimError`, `SimResult`                             |

pub mod error;
pub mod executor;
pub mod observer;
pub mod trace;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{SimError, SimResult};
pub use executor::{ExecConfig, FormationExec};
pub use observer::{ExecObserver, NoopObserver};
pub use trace::{CsvTrace, TraceRow};
