//! Route construction and spline sampling.
//!
//! A [`Route`] is an ordered walk over the waypoint graph plus the derived
//! data needed to follow it smoothly:
//!
//! - **control points** — node positions, padded with the last position to
//!   at least four points so the 4-point Catmull-Rom basis always has a full
//!   neighborhood;
//! - **arc lengths** — `arc_lengths[i]` is the polyline distance from point 0
//!   to point `i`.  The table has one extra trailing entry for the closing
//!   segment back to point 0, so sampling is periodic and the last entry is
//!   the total length.
//!
//! Sampling uses the four control points around the bracketing segment.
//! Within the walk the neighborhood is clamped at both ends, so the tangent
//! at the start points toward the second node; the closing segment borrows
//! its outer neighbors from the other end of the walk.
//!
//! # Successor policies
//!
//! | Policy          | Choice among unvisited neighbors                  |
//! |-----------------|----------------------------------------------------|
//! | Distance-greedy | minimum squared distance to the destination        |
//! | Randomized      | uniform (reservoir sampling)                       |
//!
//! Experts always use distance-greedy.  Other drivers flip a coin per hop
//! that lands on distance-greedy with probability
//! [`RouteConfig::greedy_probability`].

use av_core::math::{EPSILON, catmull_rom, inverse_lerp, repeat};
use av_core::{AgentRng, ExperienceLevel, NodeId, Vec3};
use tracing::{trace, warn};

use crate::{GraphResult, WaypointGraph};

/// Hard cap on hops per route build.  Bounds the work done in one tick.
pub const MAX_ROUTE_HOPS: usize = 20;

/// Catmull-Rom needs two points before and two after the sampled segment.
const MIN_CONTROL_POINTS: usize = 4;

/// Step used for the forward difference that yields the route direction.
const DIRECTION_STEP: f32 = 0.1;

// ── RouteConfig ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouteConfig {
    /// Probability that a non-expert picks the distance-greedy successor on
    /// a given hop.
    pub greedy_probability: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self { greedy_probability: 1.0 / 3.0 }
    }
}

// ── RoutePoint ────────────────────────────────────────────────────────────────

/// A sampled position on a route and the unit direction of travel there.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoutePoint {
    pub position:  Vec3,
    pub direction: Vec3,
}

// ── Route ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Route {
    nodes:               Vec<NodeId>,
    points:              Vec<Vec3>,
    arc_lengths:         Vec<f32>,
    destination:         Option<(NodeId, Vec3)>,
    reaches_destination: bool,
}

impl Route {
    /// Walk the graph from `start` toward `destination`.
    ///
    /// Stops after [`MAX_ROUTE_HOPS`] hops, on reaching `destination`, or
    /// when the tail has no unvisited neighbor.  In the last two cases short
    /// of the destination the route is *truncated*:
    /// [`reaches_destination`](Self::reaches_destination) is `false`.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if either endpoint is not in `graph`.
    pub fn build(
        graph:       &WaypointGraph,
        experience:  ExperienceLevel,
        start:       NodeId,
        destination: NodeId,
        config:      &RouteConfig,
        rng:         &mut AgentRng,
    ) -> GraphResult<Route> {
        graph.position(start)?;
        graph.position(destination)?;

        let mut nodes = Vec::with_capacity(MAX_ROUTE_HOPS + 1);
        nodes.push(start);

        let mut tail = start;
        while tail != destination && nodes.len() <= MAX_ROUTE_HOPS {
            let greedy = experience.always_greedy() || rng.gen_bool(config.greedy_probability);
            let next = if greedy {
                greedy_successor(graph, tail, destination, &nodes)
            } else {
                random_successor(graph, tail, &nodes, rng)
            };
            match next {
                Some(node) => {
                    nodes.push(node);
                    tail = node;
                }
                None => break,
            }
        }

        if tail != destination {
            warn!(
                %start, %destination, last = %tail, hops = nodes.len() - 1,
                "route truncated before reaching destination"
            );
        } else {
            trace!(%start, %destination, hops = nodes.len() - 1, %experience, "route built");
        }

        Route::from_nodes(graph, nodes, destination)
    }

    /// Build the derived spline data for an explicit node sequence.
    ///
    /// An empty `nodes` yields a cleared route.
    pub fn from_nodes(
        graph:       &WaypointGraph,
        nodes:       Vec<NodeId>,
        destination: NodeId,
    ) -> GraphResult<Route> {
        if nodes.is_empty() {
            return Ok(Route::default());
        }

        let mut points = nodes
            .iter()
            .map(|&id| graph.position(id))
            .collect::<GraphResult<Vec<Vec3>>>()?;
        let last = points[points.len() - 1];
        while points.len() < MIN_CONTROL_POINTS {
            points.push(last);
        }

        let n = points.len();
        let mut arc_lengths = Vec::with_capacity(n + 1);
        let mut accumulated = 0.0f32;
        for i in 0..n {
            arc_lengths.push(accumulated);
            accumulated += points[i].distance(points[(i + 1) % n]);
        }
        arc_lengths.push(accumulated);

        let reaches_destination = nodes.last() == Some(&destination);
        Ok(Route {
            nodes,
            points,
            arc_lengths,
            destination: Some((destination, graph.position(destination)?)),
            reaches_destination,
        })
    }

    /// Drop all nodes; the route becomes empty with zero length.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.points.clear();
        self.arc_lengths.clear();
        self.destination = None;
        self.reaches_destination = false;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A single-node route (start == destination).  Complete on arrival.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() == 1
    }

    #[inline]
    pub fn last_node(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Position of the last node actually on the route.
    pub fn last_position(&self) -> Option<Vec3> {
        (!self.nodes.is_empty()).then(|| self.points[self.nodes.len() - 1])
    }

    /// The node this route was built toward.
    #[inline]
    pub fn destination(&self) -> Option<NodeId> {
        self.destination.map(|(id, _)| id)
    }

    /// `false` if the build stopped short of the destination.
    #[inline]
    pub fn reaches_destination(&self) -> bool {
        self.reaches_destination
    }

    /// Length of the closed control polygon (period of [`sample`](Self::sample)).
    #[inline]
    pub fn total_length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Arc length at which the last route node is reached.
    pub fn final_node_distance(&self) -> f32 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        self.arc_lengths[self.nodes.len() - 1]
    }

    #[inline]
    pub fn arc_lengths(&self) -> &[f32] {
        &self.arc_lengths
    }

    #[inline]
    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Straight-line distance from `position` to the intended destination;
    /// `f32::INFINITY` for a cleared route.
    pub fn distance_to_destination(&self, position: Vec3) -> f32 {
        self.destination
            .map(|(_, dest)| dest.distance(position))
            .unwrap_or(f32::INFINITY)
    }

    // ── Sampling ──────────────────────────────────────────────────────────

    /// Position and unit direction at arc length `distance` (wrapped into
    /// `[0, total_length)`).
    pub fn sample(&self, distance: f32) -> RoutePoint {
        if self.points.is_empty() {
            return RoutePoint { position: Vec3::ZERO, direction: Vec3::Z };
        }
        let position = self.position_at(distance);
        let ahead = self.position_at(distance + DIRECTION_STEP);
        let direction = (ahead - position)
            .try_normalize()
            .or_else(|| self.segment_direction(distance))
            .unwrap_or(Vec3::Z);
        RoutePoint { position, direction }
    }

    fn position_at(&self, distance: f32) -> Vec3 {
        let total = self.total_length();
        if total <= EPSILON {
            return self.points[0];
        }
        let n = self.points.len();
        let d = repeat(distance, total);

        // First table entry >= d; entry 0 is 0 so clamp to segment 1.
        let point = self.arc_lengths.partition_point(|&a| a < d).clamp(1, n);
        let t = inverse_lerp(self.arc_lengths[point - 1], self.arc_lengths[point], d);

        // Neighbors clamp at the open ends of the walk; only the closing
        // segment (point == n) wraps around to the start.
        let p0 = self.points[point.saturating_sub(2)];
        let p1 = self.points[point - 1];
        let p2 = self.points[point % n];
        let p3 = if point == n {
            self.points[1 % n]
        } else {
            self.points[(point + 1).min(n - 1)]
        };
        catmull_rom(p0, p1, p2, p3, t)
    }

    /// Direction of the first non-degenerate polyline segment at or after
    /// `distance`.
    fn segment_direction(&self, distance: f32) -> Option<Vec3> {
        let n = self.points.len();
        let d = repeat(distance, self.total_length());
        let start = self.arc_lengths.partition_point(|&a| a <= d).saturating_sub(1);
        (0..n)
            .map(|k| (start + k) % n)
            .find_map(|i| (self.points[(i + 1) % n] - self.points[i]).try_normalize())
    }
}

// ── Successor policies ────────────────────────────────────────────────────────

fn greedy_successor(
    graph:       &WaypointGraph,
    tail:        NodeId,
    destination: NodeId,
    visited:     &[NodeId],
) -> Option<NodeId> {
    let target = graph.node(destination)?.position;
    graph
        .neighbors(tail)
        .iter()
        .copied()
        .filter(|n| !visited.contains(n))
        .filter_map(|n| graph.node(n).map(|node| (node.position.distance_squared(target), n)))
        // Neighbor lists are ascending, so `min_by` keeps the lowest id on ties.
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, n)| n)
}

fn random_successor(
    graph:   &WaypointGraph,
    tail:    NodeId,
    visited: &[NodeId],
    rng:     &mut AgentRng,
) -> Option<NodeId> {
    let mut seen = 0u32;
    let mut chosen = None;
    for &n in graph.neighbors(tail) {
        if visited.contains(&n) {
            continue;
        }
        seen += 1;
        if rng.gen_range(0..seen) == 0 {
            chosen = Some(n);
        }
    }
    chosen
}
