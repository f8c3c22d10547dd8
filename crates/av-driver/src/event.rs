//! Notifications a driver emits for higher-level logic.

use av_core::NodeId;

use crate::DrivingState;

/// Produced by [`Driver::update`][crate::Driver::update] and
/// [`Driver::emergency_stop`][crate::Driver::emergency_stop], drained each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    StateChanged {
        from: DrivingState,
        to:   DrivingState,
    },

    /// A new route replaced the previous one.
    RouteBuilt {
        start:               NodeId,
        destination:         NodeId,
        hops:                usize,
        reaches_destination: bool,
    },

    /// The vehicle arrived at the last node of its route.
    ///
    /// `reached_destination` is `false` when that route was truncated and
    /// `last_node` is not where the driver meant to go.
    PathCompleted {
        last_node:           NodeId,
        reached_destination: bool,
    },
}
