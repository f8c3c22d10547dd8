//! `av-driver` — the per-vehicle driving state machine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`state`]    | `DrivingState` enum                                           |
//! | [`config`]   | `DriverConfig`, `BrakePolicy`, `ReservationShape`             |
//! | [`context`]  | `DriveContext<'a>` (graph + grid borrow), `Perception`        |
//! | [`steering`] | desired-speed heuristics and the steer/throttle control law   |
//! | [`driver`]   | `Driver` — state, timers, owned route; `Decision`             |
//! | [`event`]    | `DriverEvent` (`StateChanged`, `RouteBuilt`, `PathCompleted`) |
//! | [`error`]    | `DriverError`, `DriverResult<T>`                              |
//!
//! # One update
//!
//! 1. The caller clears the agent's previous reservation from the grid.
//! 2. [`Driver::update`] reads its [`Perception`] and the shared
//!    [`DriveContext`], runs the active state, and returns a [`Decision`]:
//!    controls for the drivetrain, the reservation to register, and any
//!    events.
//! 3. The caller registers the reservation before the next agent updates.
//!
//! A driver only ever touches its own route and timers; the graph and grid
//! are borrowed read-only.

pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod event;
pub mod state;
pub mod steering;


pub use config::{BrakePolicy, DriverConfig, ReservationShape};
pub use context::{DriveContext, Perception};
pub use driver::{Decision, Driver};
pub use error::{DriverError, DriverResult};
pub use event::DriverEvent;
pub use state::DrivingState;
