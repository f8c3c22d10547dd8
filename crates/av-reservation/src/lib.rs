//! `av-reservation` — decentralized spatial conflict avoidance.
//!
//! Every vehicle claims a circle of road just ahead of itself once per tick
//! (a [`Reservation`]).  Before claiming, it asks the shared
//! [`ReservationGrid`] whether that circle overlaps anyone else's claim.
//! There is no coordinator: each agent only ever inserts and removes entries
//! keyed by its own `AgentId`.
//!
//! # Crate layout
//!
//! | Module    | Contents                                               |
//! |-----------|--------------------------------------------------------|
//! | [`grid`]  | `Reservation`, `CellCoord`, `ReservationGrid`          |
//! | [`error`] | `GridError`, `GridResult<T>`                           |
//!
//! # Ordering bias
//!
//! Agents are processed in a fixed order each tick, so an agent earlier in
//! the order has already claimed its circle when a later agent checks.  The
//! later agent sees the conflict; the earlier one did not.  This is accepted:
//! it keeps every operation proportional to the cells an agent touches.

pub mod error;
pub mod grid;


pub use error::{GridError, GridResult};
pub use grid::{CellCoord, Reservation, ReservationGrid};
