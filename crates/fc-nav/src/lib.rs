//! `fc-nav` — the navigation boundary of the fc framework.
//!
//! Formation coordination consumes path following, it does not implement it.
//! This crate defines the contract the engine codes against and a minimal
//! reference implementation for hosts (and tests) without real navigation
//! middleware.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`follower`]  | `PathFollower` — the per-agent velocity/destination contract |
//! | [`access`]    | `NavAccess` — look up a follower by `AgentId`                |
//! | [`kinematic`] | `Motion` + `KinematicFollower` — straight-line reference impl|

pub mod access;
pub mod follower;
pub mod kinematic;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use access::NavAccess;
pub use follower::PathFollower;
pub use kinematic::{KinematicFollower, Motion};
