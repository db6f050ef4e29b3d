//! `fc-core` — foundational types for the `fc` formation coordination
//! framework.
//!
//! This crate is a dependency of every other `fc-*` crate.  It intentionally
//! has no `fc-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                             |
//! |--------------|------------------------------------------------------|
//! | [`ids`]      | `AgentId`, `GroupId`, `SlotId`                       |
//! | [`vec`]      | `Vec3` and rotation helpers                          |
//! | [`time`]     | `Tick`, `SimClock`                                   |
//! | [`status`]   | `GroupState`, `TickStatus`                           |
//! | [`error`]    | `FcError`, `FcResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.       |
//!           | Required by `fc-formation` snapshots.                     |

pub mod error;
pub mod ids;
pub mod status;
pub mod time;
pub mod vec;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{FcError, FcResult};
pub use ids::{AgentId, GroupId, SlotId};
pub use status::{GroupState, TickStatus};
pub use time::{SimClock, Tick};
pub use vec::Vec3;
