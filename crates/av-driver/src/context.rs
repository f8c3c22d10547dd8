//! Read-only inputs to one driver update.

use av_core::{Quat, Vec3};
use av_graph::WaypointGraph;
use av_reservation::ReservationGrid;

/// Shared world state, borrowed for one agent's update.
///
/// The grid reflects every reservation registered so far this tick, so
/// agents earlier in the update order are seen at their new claims and
/// later agents at last tick's.
pub struct DriveContext<'a> {
    pub graph: &'a WaypointGraph,
    pub grid:  &'a ReservationGrid,
    /// Seconds since the previous update.
    pub dt:    f32,
}

impl<'a> DriveContext<'a> {
    #[inline]
    pub fn new(graph: &'a WaypointGraph, grid: &'a ReservationGrid, dt: f32) -> Self {
        Self { graph, grid, dt }
    }
}

/// The vehicle's own rigid-body state as the driver sees it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Perception {
    pub position:         Vec3,
    pub rotation:         Quat,
    pub velocity:         Vec3,
    pub angular_velocity: Vec3,
    /// Top speed of the vehicle, m/s.
    pub top_speed:        f32,
}

impl Perception {
    /// A vehicle at rest at `position`, facing `rotation`.
    pub fn at_rest(position: Vec3, rotation: Quat, top_speed: f32) -> Self {
        Self { position, rotation, velocity: Vec3::ZERO, angular_velocity: Vec3::ZERO, top_speed }
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Velocity along the heading; negative while reversing.
    #[inline]
    pub fn forward_speed(&self) -> f32 {
        self.velocity.dot(self.forward())
    }

    /// `world` expressed in the vehicle's frame (+X right, +Z ahead).
    #[inline]
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }
}
