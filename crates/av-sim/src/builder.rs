//! Fluent builder for constructing a [`Sim`].

use av_core::{AgentId, SimConfig};
use av_graph::WaypointGraph;
use av_reservation::ReservationGrid;
use tracing::{info, warn};

use crate::{AgentSpec, Sim, SimBody, SimError, SimResult, VehicleAgent};

/// Fluent builder for [`Sim<B>`].
///
/// Agents are numbered in the order they are added; that order is also the
/// per-tick update order.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, graph)
///     .agent(AgentSpec::default(), KinematicBody::at(start, Vec3::Z))
///     .agents(specs, bodies)
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<B: SimBody> {
    config: SimConfig,
    graph:  WaypointGraph,
    specs:  Vec<AgentSpec>,
    bodies: Vec<B>,
}

impl<B: SimBody> SimBuilder<B> {
    pub fn new(config: SimConfig, graph: WaypointGraph) -> Self {
        Self { config, graph, specs: Vec::new(), bodies: Vec::new() }
    }

    /// Add one vehicle.
    pub fn agent(mut self, spec: AgentSpec, body: B) -> Self {
        self.specs.push(spec);
        self.bodies.push(body);
        self
    }

    /// Add vehicles pairwise.  `specs` and `bodies` must be the same length;
    /// this is checked by [`build`](Self::build).
    pub fn agents(mut self, specs: Vec<AgentSpec>, bodies: Vec<B>) -> Self {
        self.specs.extend(specs);
        self.bodies.extend(bodies);
        self
    }

    /// Validate inputs, create the reservation grid and agents, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<B>> {
        self.config.validate()?;
        let agent_count = self.specs.len();
        if self.bodies.len() != agent_count {
            return Err(SimError::AgentCountMismatch {
                expected: agent_count,
                got:      self.bodies.len(),
                what:     "vehicle bodies",
            });
        }

        let grid = ReservationGrid::new(self.config.reservation_cell_size)?;

        // ── Build agents ──────────────────────────────────────────────────
        let mut agents = Vec::with_capacity(agent_count);
        for (i, (spec, body)) in self.specs.into_iter().zip(self.bodies).enumerate() {
            let id = AgentId::try_from(i)
                .map_err(|_| SimError::Config(format!("agent index {i} does not fit a u32")))?;
            let radius = spec.max_reservation_radius();
            if !grid.supports_radius(radius) {
                warn!(
                    agent = %id, radius, cell_size = grid.cell_size(),
                    "reservation radius exceeds half the grid cell; conflicts may be missed"
                );
            }
            agents.push(VehicleAgent::new(id, spec, body, self.config.seed)?);
        }

        info!(agents = agent_count, nodes = self.graph.len(), "simulation built");
        Ok(Sim {
            clock: self.config.make_clock(),
            config: self.config,
            graph: self.graph,
            grid,
            agents,
        })
    }
}
