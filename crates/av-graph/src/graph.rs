//! Waypoint graph representation and builder.
//!
//! # Data layout
//!
//! Nodes live in a flat arena (`Vec<WaypointNode>`) indexed by `NodeId`.
//! Adjacency is stored on each node as a list of neighbor handles, so the
//! cyclic road topology never turns into cyclic ownership.
//!
//! Links are bidirectional: [`WaypointGraphBuilder::link`] records one
//! undirected link and `build()` inserts it on both endpoints.  Symmetry is a
//! build-time property and is not re-checked at runtime.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over node positions answers nearest-node queries.
//! The view-cone query walks its nearest-neighbor iterator in ascending
//! distance and stops at the first node inside the cone.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use av_core::math::angle_between_deg;
use av_core::{AgentRng, NodeId, Quat, Vec3};

use crate::{GraphError, GraphResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 3],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── WaypointNode ──────────────────────────────────────────────────────────────

/// One navigable position on the road graph.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointNode {
    pub id:       NodeId,
    pub position: Vec3,
    pub rotation: Quat,
    neighbors:    Vec<NodeId>,
}

impl WaypointNode {
    /// Handles of directly linked nodes, ascending.
    #[inline]
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    /// The node's authored forward direction (+Z rotated by `rotation`).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

// ── WaypointGraph ─────────────────────────────────────────────────────────────

/// Immutable road graph shared by every vehicle.  Build with
/// [`WaypointGraphBuilder`].
pub struct WaypointGraph {
    nodes:       Vec<WaypointNode>,
    spatial_idx: RTree<NodeEntry>,
}

impl WaypointGraph {
    /// A graph with no nodes.  Every vehicle placed on it stays parked.
    pub fn empty() -> Self {
        WaypointGraphBuilder::new().build()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&WaypointNode> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &WaypointNode> + '_ {
        self.nodes.iter()
    }

    /// Position of `id`, or `NodeNotFound`.
    #[inline]
    pub fn position(&self, id: NodeId) -> GraphResult<Vec3> {
        self.node(id)
            .map(|n| n.position)
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Neighbors of `id`; an unknown id has none.
    #[inline]
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(WaypointNode::neighbors).unwrap_or(&[])
    }

    pub fn are_linked(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `position`.  `None` only if the graph is empty.
    pub fn closest_node(&self, position: Vec3) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&position.to_array())
            .map(|e| e.id)
    }

    /// Nearest node whose direction from `position` lies within
    /// `view_angle_degrees / 2` of `forward`.
    ///
    /// Falls back to the nearest node overall when nothing is inside the
    /// cone, so the result is `Some` whenever the graph is non-empty.  A node
    /// exactly at `position` counts as inside the cone.
    pub fn closest_node_in_front_of(
        &self,
        position:           Vec3,
        forward:            Vec3,
        view_angle_degrees: f32,
    ) -> Option<NodeId> {
        let half_angle = view_angle_degrees * 0.5;
        let mut nearest = None;

        for entry in self.spatial_idx.nearest_neighbor_iter(&position.to_array()) {
            if nearest.is_none() {
                nearest = Some(entry.id);
            }
            let to_node = Vec3::from_array(entry.point) - position;
            if angle_between_deg(forward, to_node) <= half_angle {
                return Some(entry.id);
            }
        }
        nearest
    }

    /// Uniformly pick a destination that is neither `start` nor one of its
    /// direct neighbors, so a route always spans more than one hop.
    ///
    /// Returns `None` when no such node exists.
    pub fn random_destination(&self, start: NodeId, rng: &mut AgentRng) -> Option<NodeId> {
        let excluded = self.neighbors(start);
        let mut seen = 0u32;
        let mut chosen = None;

        // Reservoir sampling (k = 1) avoids collecting the candidate set.
        for node in &self.nodes {
            if node.id == start || excluded.binary_search(&node.id).is_ok() {
                continue;
            }
            seen += 1;
            if rng.gen_range(0..seen) == 0 {
                chosen = Some(node.id);
            }
        }
        chosen
    }
}

// ── WaypointGraphBuilder ──────────────────────────────────────────────────────

/// Construct a [`WaypointGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use av_core::Vec3;
/// use av_graph::WaypointGraphBuilder;
///
/// let mut b = WaypointGraphBuilder::new();
/// let a = b.add_waypoint(Vec3::new(0.0, 0.0, 0.0));
/// let c = b.add_waypoint(Vec3::new(0.0, 0.0, 20.0));
/// b.link(a, c).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.len(), 2);
/// assert!(graph.are_linked(c, a)); // links are bidirectional
/// ```
pub struct WaypointGraphBuilder {
    nodes: Vec<(Vec3, Quat)>,
    links: Vec<(NodeId, NodeId)>,
}

impl WaypointGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), links: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            links: Vec::with_capacity(links),
        }
    }

    /// Add a node with an explicit orientation; ids are sequential from 0.
    pub fn add_node(&mut self, position: Vec3, rotation: Quat) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push((position, rotation));
        id
    }

    /// Add a node with identity orientation.
    pub fn add_waypoint(&mut self, position: Vec3) -> NodeId {
        self.add_node(position, Quat::IDENTITY)
    }

    /// Record an undirected link between `a` and `b`.
    ///
    /// Self-links and repeated links are accepted and dropped in `build()`.
    pub fn link(&mut self, a: NodeId, b: NodeId) -> GraphResult<()> {
        for id in [a, b] {
            if id.index() >= self.nodes.len() {
                return Err(GraphError::NodeNotFound(id));
            }
        }
        self.links.push((a, b));
        Ok(())
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn link_count(&self) -> usize { self.links.len() }

    /// Consume the builder and produce a [`WaypointGraph`].
    ///
    /// Neighbor lists are sorted and deduplicated, which keeps `are_linked`
    /// a binary search and route building deterministic.
    pub fn build(self) -> WaypointGraph {
        let mut adjacency: Vec<Vec<NodeId>> = vec![Vec::new(); self.nodes.len()];
        for (a, b) in self.links {
            if a == b {
                continue;
            }
            adjacency[a.index()].push(b);
            adjacency[b.index()].push(a);
        }

        let nodes: Vec<WaypointNode> = self
            .nodes
            .into_iter()
            .zip(adjacency)
            .enumerate()
            .map(|(i, ((position, rotation), mut neighbors))| {
                neighbors.sort_unstable();
                neighbors.dedup();
                WaypointNode { id: NodeId(i as u32), position, rotation, neighbors }
            })
            .collect();

        let entries: Vec<NodeEntry> = nodes
            .iter()
            .map(|n| NodeEntry { point: n.position.to_array(), id: n.id })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        WaypointGraph { nodes, spatial_idx }
    }
}

impl Default for WaypointGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
