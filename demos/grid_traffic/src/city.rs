//! Synthetic downtown: a square block lattice with two-way streets.

use av_core::{NodeId, Vec3};
use av_graph::{GraphResult, WaypointGraph, WaypointGraphBuilder};

/// Build a `side × side` lattice of intersections `block` metres apart.
///
/// Returns the graph and the intersections row by row, so `ids[r * side + c]`
/// sits at `(c * block, 0, r * block)`.
pub fn build_city(side: usize, block: f32) -> GraphResult<(WaypointGraph, Vec<NodeId>)> {
    let mut b = WaypointGraphBuilder::new();
    let ids: Vec<NodeId> = (0..side * side)
        .map(|i| b.add_waypoint(Vec3::new((i % side) as f32 * block, 0.0, (i / side) as f32 * block)))
        .collect();

    for row in 0..side {
        for col in 0..side {
            let here = ids[row * side + col];
            if col + 1 < side {
                b.link(here, ids[row * side + col + 1])?;
            }
            if row + 1 < side {
                b.link(here, ids[(row + 1) * side + col])?;
            }
        }
    }
    Ok((b.build(), ids))
}
