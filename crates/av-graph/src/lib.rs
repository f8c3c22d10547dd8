//! `av-graph` — waypoint road graph, routes, and route following.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`graph`]    | `WaypointGraph` (node arena + R-tree), `WaypointGraphBuilder` |
//! | [`route`]    | `Route`, `RouteConfig`, `RoutePoint`, spline sampling      |
//! | [`progress`] | `ProgressTracker` — progress along a route, look-ahead target |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on config types.           |

pub mod error;
pub mod graph;
pub mod progress;
pub mod route;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use graph::{WaypointGraph, WaypointGraphBuilder, WaypointNode};
pub use progress::{ProgressTracker, TrackerConfig};
pub use route::{MAX_ROUTE_HOPS, Route, RouteConfig, RoutePoint};
