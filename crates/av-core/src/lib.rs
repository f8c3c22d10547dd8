//! `av-core` — foundational types for the vehicle navigation workspace.
//!
//! This crate is a dependency of every other `av-*` crate.  It has no `av-*`
//! dependencies and only a few external ones (`glam`, `rand`, `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `NodeId`                                       |
//! | [`controls`]| `Controls` (steering, throttle, brake, handbrake)         |
//! | [`math`]    | `Vec3`/`Quat` re-exports, `lerp`, `inverse_lerp`, Catmull-Rom |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                           |
//! | [`rng`]     | `AgentRng` (per-agent)                                    |
//! | [`profile`] | `ExperienceLevel`, `BehaviorProfile`                      |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod controls;
pub mod error;
pub mod ids;
pub mod math;
pub mod profile;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use controls::Controls;
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, NodeId};
pub use math::{Quat, Vec3};
pub use profile::{BehaviorProfile, ExperienceLevel};
pub use rng::AgentRng;
pub use time::{SimClock, SimConfig, Tick};
