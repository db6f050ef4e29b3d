//! `fc-formation` — the formation coordination core.
//!
//! Keeps a set of independently ticking agents organized into named groups,
//! advances each group through a shared movement life-cycle, matches members
//! to slots in a pluggable spatial pattern, and keeps stragglers from falling
//! behind or stalling the group forever.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`config`]   | `MemberConfig`, `OrientationMode`                           |
//! | [`group`]    | `FormationGroup` — shared per-group state                   |
//! | [`member`]   | `FormationMember`, `StuckDetector`                          |
//! | [`engine`]   | `FormationEngine` — registry + member tick + leader logic   |
//! | [`assign`]   | greedy nearest-slot assignment                              |
//! | [`snapshot`] | save/resume records                                         |
//!
//! # Coordination model
//!
//! One member per group — the **leader**, always the head of the membership
//! list — advances the shared [`GroupState`][fc_core::GroupState] machine
//! during its own tick:
//!
//! 1. **Initialized**: wait out the settling delay, fix the group direction
//!    and center, assign slots.
//! 2. **MoveToFormation**: wait for every member to park on its slot (where
//!    the shape permits pre-positioning) and rotate into the group
//!    direction.
//! 3. **MoveToTarget**: drive all members to the pattern around the true
//!    target, throttling or boosting speeds to hold the group together.
//! 4. **Arrived** / **Failure**: terminal; every member resolves its next
//!    tick immediately.
//!
//! Destinations are only ever *pushed* to members by the leader (at slot
//! assignment, departure, late join, and reindexing), so the design
//! tolerates one tick of staleness regardless of the order agents tick in.
//!
//! # Concurrency
//!
//! None.  All operations are non-blocking per-tick computation, serialized
//! by the host executor.  A host that ticks agents from multiple threads
//! must wrap the engine in its own lock — the membership scans here are not
//! safe under concurrent mutation.

pub mod assign;
pub mod config;
pub mod engine;
pub mod group;
pub mod member;
pub mod snapshot;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{MemberConfig, OrientationMode};
pub use engine::FormationEngine;
pub use group::FormationGroup;
pub use member::{FormationMember, StuckDetector};
pub use snapshot::{GroupRecord, MemberRecord, MemberSnapshot};
