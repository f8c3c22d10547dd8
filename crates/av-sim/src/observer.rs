//! Simulation observer trait for progress reporting and data collection.

use av_core::{AgentId, NodeId, Tick};
use av_driver::DrivingState;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: arrival counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Arrivals(usize);
///
/// impl SimObserver for Arrivals {
///     fn on_path_completed(&mut self, _: Tick, _: AgentId, _: NodeId, reached: bool) {
///         if reached {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any agent updates.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after every agent has ticked and every body has integrated.
    ///
    /// `driving` counts agents that ended the tick in a driving state.
    fn on_tick_end(&mut self, _tick: Tick, _driving: usize) {}

    fn on_state_changed(
        &mut self,
        _tick:  Tick,
        _agent: AgentId,
        _from:  DrivingState,
        _to:    DrivingState,
    ) {}

    fn on_route_built(
        &mut self,
        _tick:        Tick,
        _agent:       AgentId,
        _start:       NodeId,
        _destination: NodeId,
        _hops:        usize,
    ) {}

    /// An agent finished its route.  `reached_destination` is `false` when
    /// the route had been truncated short of the intended destination.
    fn on_path_completed(
        &mut self,
        _tick:                Tick,
        _agent:               AgentId,
        _last_node:           NodeId,
        _reached_destination: bool,
    ) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
