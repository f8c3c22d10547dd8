//! Unit tests for av-graph.
//!
//! All tests use hand-built graphs.

#[cfg(test)]
mod helpers {
    use av_core::{NodeId, Vec3};
    use crate::{WaypointGraph, WaypointGraphBuilder};

    /// Four nodes on a 10 m square, linked around the perimeter:
    ///
    /// ```text
    ///   3 ── 2        z
    ///   │    │        ↑
    ///   0 ── 1        └→ x
    /// ```
    ///
    /// 0 and 2 are diagonal with no direct link.
    pub fn square() -> (WaypointGraph, [NodeId; 4]) {
        let mut b = WaypointGraphBuilder::new();
        let n0 = b.add_waypoint(Vec3::new(0.0, 0.0, 0.0));
        let n1 = b.add_waypoint(Vec3::new(10.0, 0.0, 0.0));
        let n2 = b.add_waypoint(Vec3::new(10.0, 0.0, 10.0));
        let n3 = b.add_waypoint(Vec3::new(0.0, 0.0, 10.0));
        b.link(n0, n1).unwrap();
        b.link(n1, n2).unwrap();
        b.link(n2, n3).unwrap();
        b.link(n3, n0).unwrap();
        (b.build(), [n0, n1, n2, n3])
    }

    /// `n` nodes in a straight line along +Z, 10 m apart.
    pub fn line(n: usize) -> (WaypointGraph, Vec<NodeId>) {
        let mut b = WaypointGraphBuilder::new();
        let ids: Vec<NodeId> = (0..n)
            .map(|i| b.add_waypoint(Vec3::new(0.0, 0.0, 10.0 * i as f32)))
            .collect();
        for w in ids.windows(2) {
            b.link(w[0], w[1]).unwrap();
        }
        (b.build(), ids)
    }
}

// ── Builder & structure ───────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use av_core::{NodeId, Vec3};
    use crate::{GraphError, WaypointGraphBuilder};

    #[test]
    fn empty_build() {
        let graph = WaypointGraphBuilder::new().build();
        assert_eq!(graph.len(), 0);
        assert!(graph.is_empty());
        assert!(graph.closest_node(Vec3::ZERO).is_none());
    }

    #[test]
    fn links_are_symmetric() {
        let (graph, [n0, n1, n2, n3]) = super::helpers::square();
        for (a, b) in [(n0, n1), (n1, n2), (n2, n3), (n3, n0)] {
            assert!(graph.are_linked(a, b));
            assert!(graph.are_linked(b, a));
        }
        assert!(!graph.are_linked(n0, n2));
    }

    #[test]
    fn self_and_duplicate_links_dropped() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_waypoint(Vec3::ZERO);
        let c = b.add_waypoint(Vec3::X);
        b.link(a, a).unwrap();
        b.link(a, c).unwrap();
        b.link(c, a).unwrap();
        let graph = b.build();
        assert_eq!(graph.neighbors(a), &[c]);
        assert_eq!(graph.neighbors(c), &[a]);
    }

    #[test]
    fn link_unknown_node_errors() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_waypoint(Vec3::ZERO);
        let result = b.link(a, NodeId(9));
        assert!(matches!(result, Err(GraphError::NodeNotFound(NodeId(9)))));
    }

    #[test]
    fn node_forward_follows_rotation() {
        let mut b = WaypointGraphBuilder::new();
        let id = b.add_node(Vec3::ZERO, av_core::math::yaw_rotation(Vec3::X));
        let graph = b.build();
        assert!(graph.node(id).unwrap().forward().distance(Vec3::X) < 1e-5);
    }
}

// ── Spatial queries ───────────────────────────────────────────────────────────

#[cfg(test)]
mod closest {
    use av_core::Vec3;

    #[test]
    fn nearest_overall() {
        let (graph, [n0, n1, ..]) = super::helpers::square();
        assert_eq!(graph.closest_node(Vec3::new(1.0, 0.0, 1.0)), Some(n0));
        assert_eq!(graph.closest_node(Vec3::new(9.0, 0.0, -1.0)), Some(n1));
    }

    #[test]
    fn view_cone_prefers_node_ahead() {
        let (graph, [n0, _, _, n3]) = super::helpers::square();
        // Just above node 0 facing +Z: node 0 is nearest but behind.
        let pos = Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(graph.closest_node(pos), Some(n0));
        assert_eq!(graph.closest_node_in_front_of(pos, Vec3::Z, 90.0), Some(n3));
    }

    #[test]
    fn view_cone_falls_back_to_nearest() {
        let (graph, [n0, ..]) = super::helpers::square();
        // Facing away from every node.
        let pos = Vec3::new(-5.0, 0.0, -5.0);
        let found = graph.closest_node_in_front_of(pos, -Vec3::X, 10.0);
        assert_eq!(found, Some(n0));
    }

    #[test]
    fn view_cone_empty_graph() {
        let graph = crate::WaypointGraph::empty();
        assert!(graph.closest_node_in_front_of(Vec3::ZERO, Vec3::Z, 90.0).is_none());
    }
}

#[cfg(test)]
mod destinations {
    use av_core::{AgentId, AgentRng};

    #[test]
    fn never_start_or_neighbor() {
        let (graph, [n0, _, n2, _]) = super::helpers::square();
        let mut rng = AgentRng::new(7, AgentId(0));
        for _ in 0..50 {
            assert_eq!(graph.random_destination(n0, &mut rng), Some(n2));
        }
    }

    #[test]
    fn none_when_everything_is_adjacent() {
        let (graph, ids) = super::helpers::line(3);
        let mut rng = AgentRng::new(7, AgentId(0));
        assert_eq!(graph.random_destination(ids[1], &mut rng), None);
    }

    #[test]
    fn covers_all_candidates() {
        let (graph, ids) = super::helpers::line(6);
        let mut rng = AgentRng::new(11, AgentId(2));
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(graph.random_destination(ids[0], &mut rng).unwrap());
        }
        // Excludes node 0 and its neighbor node 1.
        assert_eq!(seen.len(), 4);
        assert!(!seen.contains(&ids[0]) && !seen.contains(&ids[1]));
    }
}

// ── Route building ────────────────────────────────────────────────────────────

#[cfg(test)]
mod build {
    use av_core::{AgentId, AgentRng, ExperienceLevel, NodeId};
    use crate::{GraphError, Route, RouteConfig, WaypointGraphBuilder, MAX_ROUTE_HOPS};

    fn rng() -> AgentRng {
        AgentRng::new(42, AgentId(0))
    }

    #[test]
    fn expert_square_diagonal() {
        let (graph, [n0, n1, n2, n3]) = super::helpers::square();
        let route = Route::build(
            &graph, ExperienceLevel::Expert, n0, n2, &RouteConfig::default(), &mut rng(),
        )
        .unwrap();
        assert_eq!(route.len(), 3);
        assert_eq!(route.nodes()[0], n0);
        assert!(route.nodes()[1] == n1 || route.nodes()[1] == n3);
        assert_eq!(route.nodes()[2], n2);
        assert!(route.reaches_destination());
    }

    #[test]
    fn start_equals_destination() {
        let (graph, [n0, ..]) = super::helpers::square();
        let route = Route::build(
            &graph, ExperienceLevel::Novice, n0, n0, &RouteConfig::default(), &mut rng(),
        )
        .unwrap();
        assert_eq!(route.nodes(), &[n0]);
        assert!(route.is_trivial());
        assert_eq!(route.total_length(), 0.0);
        assert!(route.reaches_destination());
    }

    #[test]
    fn novice_never_revisits_and_reaches_on_line() {
        let (graph, ids) = super::helpers::line(6);
        let mut rng = rng();
        for _ in 0..20 {
            let route = Route::build(
                &graph, ExperienceLevel::Novice, ids[0], ids[5], &RouteConfig::default(), &mut rng,
            )
            .unwrap();
            // On a line every unvisited neighbor is the next node.
            assert_eq!(route.nodes(), ids.as_slice());
        }
    }

    #[test]
    fn unreachable_destination_truncates() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_waypoint(av_core::Vec3::ZERO);
        let c = b.add_waypoint(av_core::Vec3::X);
        let island = b.add_waypoint(av_core::Vec3::new(50.0, 0.0, 0.0));
        b.link(a, c).unwrap();
        let graph = b.build();

        let route = Route::build(
            &graph, ExperienceLevel::Expert, a, island, &RouteConfig::default(), &mut rng(),
        )
        .unwrap();
        assert_eq!(route.nodes(), &[a, c]);
        assert!(!route.reaches_destination());
        assert_eq!(route.destination(), Some(island));
        assert_eq!(route.last_node(), Some(c));
    }

    #[test]
    fn hop_cap_enforced() {
        let (graph, ids) = super::helpers::line(40);
        let route = Route::build(
            &graph, ExperienceLevel::Expert, ids[0], ids[39], &RouteConfig::default(), &mut rng(),
        )
        .unwrap();
        assert_eq!(route.len(), MAX_ROUTE_HOPS + 1);
        assert!(!route.reaches_destination());
    }

    #[test]
    fn unknown_node_errors() {
        let (graph, [n0, ..]) = super::helpers::square();
        let result = Route::build(
            &graph, ExperienceLevel::Expert, n0, NodeId(99), &RouteConfig::default(), &mut rng(),
        );
        assert!(matches!(result, Err(GraphError::NodeNotFound(NodeId(99)))));
    }

    #[test]
    fn cleared_route_has_infinite_distance() {
        let (graph, [n0, _, n2, _]) = super::helpers::square();
        let mut route = Route::build(
            &graph, ExperienceLevel::Expert, n0, n2, &RouteConfig::default(), &mut rng(),
        )
        .unwrap();
        assert!((route.distance_to_destination(av_core::Vec3::new(10.0, 0.0, 0.0)) - 10.0).abs() < 1e-4);
        route.clear();
        assert!(route.is_empty());
        assert_eq!(route.total_length(), 0.0);
        assert_eq!(route.distance_to_destination(av_core::Vec3::ZERO), f32::INFINITY);
    }
}

// ── Arc lengths & sampling ────────────────────────────────────────────────────

#[cfg(test)]
mod sampling {
    use av_core::Vec3;
    use crate::Route;

    fn three_node_route() -> Route {
        let (graph, ids) = super::helpers::line(3);
        Route::from_nodes(&graph, ids.clone(), ids[2]).unwrap()
    }

    #[test]
    fn padded_to_four_control_points() {
        let route = three_node_route();
        assert_eq!(route.len(), 3);
        assert_eq!(route.control_points().len(), 4);
        assert_eq!(route.arc_lengths().len(), 5);
    }

    #[test]
    fn arc_lengths_monotonic_and_total() {
        let route = three_node_route();
        let arc = route.arc_lengths();
        assert!(arc.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*arc.last().unwrap(), route.total_length());
        // 10 + 10 out, 0 for the padding point, 20 closing back to the start.
        assert!((route.total_length() - 40.0).abs() < 1e-4);
        assert!((route.final_node_distance() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn samples_pass_through_nodes() {
        let route = three_node_route();
        assert!(route.sample(0.0).position.distance(Vec3::ZERO) < 1e-4);
        assert!(route.sample(10.0).position.distance(Vec3::new(0.0, 0.0, 10.0)) < 1e-4);
        assert!(route.sample(0.0).direction.dot(Vec3::Z) > 0.9);
        assert!(route.sample(5.0).direction.dot(Vec3::Z) > 0.9);
    }

    #[test]
    fn first_segment_leaves_the_start_forward() {
        let route = three_node_route();
        let mut prev = route.sample(0.0).position.z;
        for step in 1..=40 {
            let p = route.sample(step as f32 * 0.25).position;
            assert!(p.x.abs() < 1e-4);
            assert!(p.z >= prev, "backtracked at step {step}");
            prev = p.z;
        }
        assert!((prev - 10.0).abs() < 1e-3);
    }

    #[test]
    fn sampling_is_continuous() {
        let (graph, [n0, n1, n2, n3]) = super::helpers::square();
        let route = Route::from_nodes(&graph, vec![n0, n1, n2, n3], n3).unwrap();
        let step = 0.01;
        let mut prev = route.sample(0.0).position;
        let mut d = step;
        while d < 2.0 * route.total_length() {
            let p = route.sample(d).position;
            assert!(p.distance(prev) < 0.1, "jump at d = {d}");
            prev = p;
            d += step;
        }
    }

    #[test]
    fn sampling_is_periodic() {
        let route = three_node_route();
        let period = route.total_length();
        for d in [0.0, 3.5, 12.0, 27.0, 39.9] {
            let a = route.sample(d).position;
            let b = route.sample(d + period).position;
            let c = route.sample(d - period).position;
            assert!(a.distance(b) < 1e-3, "d = {d}");
            assert!(a.distance(c) < 1e-3, "d = {d}");
        }
    }

    #[test]
    fn direction_is_unit() {
        let route = three_node_route();
        for d in [0.0, 5.0, 19.95, 20.0, 25.0] {
            assert!((route.sample(d).direction.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn zero_length_route_samples_its_node() {
        let (graph, ids) = super::helpers::line(2);
        let route = Route::from_nodes(&graph, vec![ids[1]], ids[1]).unwrap();
        let p = route.sample(123.0);
        assert_eq!(p.position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(p.direction, Vec3::Z);
    }
}

// ── Progress tracking ─────────────────────────────────────────────────────────

#[cfg(test)]
mod progress {
    use av_core::Vec3;
    use crate::{ProgressTracker, Route, TrackerConfig};

    fn line_route(n: usize) -> Route {
        let (graph, ids) = super::helpers::line(n);
        let last = ids[n - 1];
        Route::from_nodes(&graph, ids, last).unwrap()
    }

    #[test]
    fn advances_when_vehicle_passes_point() {
        let route = line_route(4);
        let mut tracker = ProgressTracker::new(TrackerConfig::default());
        tracker.advance(&route, Vec3::new(0.0, 0.0, 12.0));
        assert!(tracker.progress() > 0.0);
        assert!(tracker.progress() < 20.0);
    }

    #[test]
    fn holds_when_vehicle_is_behind() {
        let route = line_route(4);
        let mut tracker = ProgressTracker::new(TrackerConfig::default());
        tracker.advance(&route, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(tracker.progress(), 0.0);
    }

    #[test]
    fn target_is_ahead_and_speed_scaled() {
        let route = line_route(5);
        let tracker = ProgressTracker::new(TrackerConfig::default());
        let slow = tracker.target(&route, 0.0);
        let fast = tracker.target(&route, 20.0);
        assert!(slow.position.z > 0.0);
        assert!(fast.position.z > slow.position.z);
    }

    #[test]
    fn target_never_passes_last_node() {
        let route = line_route(3);
        let tracker = ProgressTracker::new(TrackerConfig::default());
        let t = tracker.target(&route, 500.0);
        assert!(t.position.distance(Vec3::new(0.0, 0.0, 20.0)) < 1e-3);
    }

    #[test]
    fn completes_near_last_node() {
        let route = line_route(3);
        let mut tracker = ProgressTracker::new(TrackerConfig::default());
        let end = Vec3::new(0.0, 0.0, 19.0);
        assert!(!tracker.is_complete(&route, end));
        for _ in 0..20 {
            tracker.advance(&route, end);
        }
        assert!(tracker.is_complete(&route, end));
    }

    #[test]
    fn trivial_route_completes_immediately() {
        let (graph, ids) = super::helpers::line(2);
        let route = Route::from_nodes(&graph, vec![ids[0]], ids[0]).unwrap();
        let tracker = ProgressTracker::default();
        assert!(tracker.is_complete(&route, Vec3::new(100.0, 0.0, 0.0)));
        assert!(!tracker.is_complete(&Route::default(), Vec3::ZERO));
    }
}
