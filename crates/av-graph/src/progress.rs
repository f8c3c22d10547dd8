//! Progress along a route and the look-ahead steering target.
//!
//! The tracker keeps a scalar `progress_distance` (arc length along the
//! route).  Each tick it nudges that distance forward while the vehicle is
//! past the progress point, then samples the route further ahead, by a fixed
//! offset plus a speed-proportional term, to produce the target the driver
//! steers at.

use av_core::Vec3;

use crate::{Route, RoutePoint};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerConfig {
    /// Constant look-ahead in world units.
    pub lookahead_offset: f32,
    /// Extra look-ahead per m/s of speed.
    pub lookahead_speed_factor: f32,
    /// Distance from the last node at which the route counts as complete.
    pub arrival_radius: f32,
    /// Upper bound on progress updates per tick.
    pub max_advance_steps: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            lookahead_offset:       5.0,
            lookahead_speed_factor: 0.3,
            arrival_radius:         3.0,
            max_advance_steps:      8,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProgressTracker {
    config:            TrackerConfig,
    progress_distance: f32,
}

impl ProgressTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config, progress_distance: 0.0 }
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Arc length reached along the current route.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress_distance
    }

    /// Restart at the beginning of a (new) route.
    pub fn reset(&mut self) {
        self.progress_distance = 0.0;
    }

    /// Move the progress point forward while the vehicle has passed it.
    ///
    /// Progress never runs beyond the last route node, so the closing
    /// segment of the periodic spline is not followed.
    pub fn advance(&mut self, route: &Route, position: Vec3) {
        let end = route.final_node_distance();
        for _ in 0..self.config.max_advance_steps {
            if self.progress_distance >= end {
                break;
            }
            let point = route.sample(self.progress_distance);
            let delta = point.position - position;
            if delta.dot(point.direction) >= 0.0 {
                break;
            }
            self.progress_distance = (self.progress_distance + delta.length() * 0.5).min(end);
        }
    }

    /// The look-ahead point to steer at, given the current speed in m/s.
    pub fn target(&self, route: &Route, speed_mps: f32) -> RoutePoint {
        let ahead = self.config.lookahead_offset
            + self.config.lookahead_speed_factor * speed_mps.abs();
        let distance = (self.progress_distance + ahead).min(route.final_node_distance());
        route.sample(distance)
    }

    /// `true` once the vehicle has progressed to, and is near, the last
    /// node of the route.  A single-node route is complete immediately.
    ///
    /// Measured against the route's last node, which differs from the
    /// intended destination when the route was truncated.
    pub fn is_complete(&self, route: &Route, position: Vec3) -> bool {
        if route.is_empty() {
            return false;
        }
        if route.is_trivial() {
            return true;
        }
        let near_end = self.progress_distance >= route.final_node_distance() - self.config.arrival_radius;
        near_end
            && route
                .last_position()
                .is_some_and(|last| last.distance(position) <= self.config.arrival_radius)
    }
}
