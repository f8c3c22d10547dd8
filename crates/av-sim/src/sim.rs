//! The `Sim` struct and its tick loop.

use av_core::{AgentId, SimClock, SimConfig, Tick};
use av_driver::{DriverEvent, DrivingState};
use av_graph::WaypointGraph;
use av_reservation::ReservationGrid;
use tracing::trace;

use crate::{SimBody, SimError, SimObserver, SimResult, VehicleAgent};

/// The main simulation runner.
///
/// Each tick:
///
/// 1. **Agents**, in ascending `AgentId` order: clear the agent's previous
///    reservation, run its driver against the shared graph and grid,
///    register the new reservation, and write wheel commands through the
///    drivetrain.  Agents earlier in the order therefore claim space first.
/// 2. **Events** from each driver are forwarded to the observer as they
///    are produced.
/// 3. **Integrate** every body by one step.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<B: SimBody> {
    pub config: SimConfig,

    /// Simulation clock: tracks the current tick and maps it to seconds.
    pub clock: SimClock,

    /// Shared read-only road graph.
    pub graph: WaypointGraph,

    /// Shared reservation grid.  Each agent only adds or removes its own
    /// entries.
    pub grid: ReservationGrid,

    /// Indexed by `AgentId`.
    pub(crate) agents: Vec<VehicleAgent<B>>,
}

impl<B: SimBody> Sim<B> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    #[inline]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn agents(&self) -> &[VehicleAgent<B>] {
        &self.agents
    }

    /// # Errors
    ///
    /// `AgentNotFound` if `id` is out of range.
    pub fn agent(&self, id: AgentId) -> SimResult<&VehicleAgent<B>> {
        self.agents.get(id.index()).ok_or(SimError::AgentNotFound(id))
    }

    /// # Errors
    ///
    /// `AgentNotFound` if `id` is out of range.
    pub fn agent_mut(&mut self, id: AgentId) -> SimResult<&mut VehicleAgent<B>> {
        self.agents.get_mut(id.index()).ok_or(SimError::AgentNotFound(id))
    }

    /// Straight-line distance from the vehicle to its intended destination,
    /// `f32::INFINITY` while it has no route.
    pub fn distance_to_destination(&self, id: AgentId) -> SimResult<f32> {
        Ok(self.agent(id)?.distance_to_destination())
    }

    pub fn current_state(&self, id: AgentId) -> SimResult<DrivingState> {
        Ok(self.agent(id)?.state())
    }

    /// Put `id` into EmergencyStop from the next tick on.
    pub fn emergency_stop(&mut self, id: AgentId) -> SimResult<()> {
        self.agent_mut(id)?.emergency_stop();
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let driving = self.process_tick(now, observer);
        observer.on_tick_end(now, driving);
        self.clock.advance();
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> usize {
        let dt = self.clock.tick_seconds;

        // ── Phase 1: sequential agent updates ─────────────────────────────
        let mut driving = 0;
        for agent in &mut self.agents {
            let id = agent.id();
            for event in agent.tick(&self.graph, &mut self.grid, dt) {
                dispatch(observer, now, id, event);
            }
            if agent.state().is_driving() {
                driving += 1;
            }
        }

        // ── Phase 2: integrate bodies ─────────────────────────────────────
        for agent in &mut self.agents {
            agent.body_mut().integrate(dt);
        }

        trace!(tick = now.0, driving, reservations = self.grid.len(), "tick done");
        driving
    }
}

fn dispatch<O: SimObserver>(observer: &mut O, tick: Tick, agent: AgentId, event: DriverEvent) {
    match event {
        DriverEvent::StateChanged { from, to } => observer.on_state_changed(tick, agent, from, to),
        DriverEvent::RouteBuilt { start, destination, hops, .. } => {
            observer.on_route_built(tick, agent, start, destination, hops)
        }
        DriverEvent::PathCompleted { last_node, reached_destination } => {
            observer.on_path_completed(tick, agent, last_node, reached_destination)
        }
    }
}
