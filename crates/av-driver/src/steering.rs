//! Desired speed and the control law that chases a target point.

use av_core::Controls;
use av_core::Vec3;
use av_core::math::{angle_between_deg, inverse_lerp, lerp};
use av_graph::RoutePoint;

use crate::{BrakePolicy, DriverConfig, Perception};

/// How much to slow down, in `[0, 1]`, for what lies at `target`.
pub fn caution(config: &DriverConfig, p: &Perception, target: &RoutePoint) -> f32 {
    let spin = p.angular_velocity.length() * config.cautious_angular_factor;
    match config.brake_policy {
        BrakePolicy::TargetDirectionDifference => {
            let turn = angle_between_deg(target.direction, p.forward());
            inverse_lerp(0.0, config.cautious_max_angle, spin.max(turn))
        }
        BrakePolicy::TargetDistance => {
            let near = inverse_lerp(config.cautious_max_distance, 0.0, p.position.distance(target.position));
            near.max(inverse_lerp(0.0, config.cautious_max_angle, spin))
        }
        BrakePolicy::NeverBrake => 0.0,
    }
}

/// Speed to aim for in m/s: top speed, scaled down toward
/// `cautious_speed_factor` of it as caution rises.
pub fn desired_speed(config: &DriverConfig, p: &Perception, target: &RoutePoint) -> f32 {
    let top = p.top_speed;
    lerp(top, top * config.cautious_speed_factor, caution(config, p, target))
}

/// Steer at `target` and accelerate or brake toward `desired` (signed, m/s).
///
/// While `reversing` the steering is mirrored so the nose swings toward the
/// target as the vehicle backs up.
pub fn drive_toward(
    config:    &DriverConfig,
    p:         &Perception,
    target:    Vec3,
    desired:   f32,
    reversing: bool,
) -> Controls {
    let local = p.to_local(target);
    let angle = local.x.atan2(local.z).to_degrees();
    let mut steer = (angle * config.steer_sensitivity).clamp(-1.0, 1.0);
    if reversing {
        steer = -steer;
    }

    let speed = p.forward_speed();
    let sensitivity = if desired < speed { config.brake_sensitivity } else { config.accel_sensitivity };
    Controls::from_accel(steer, (desired - speed) * sensitivity)
}
