//! Vector math helpers shared by routing, steering, and the drivetrain.
//!
//! Positions are `glam::Vec3` in a Y-up world: the ground plane is X/Z, and
//! a yaw-only rotation turns +Z (forward) towards +X (right).

pub use glam::{Quat, Vec3};

/// Tolerance below which lengths are treated as zero.
pub const EPSILON: f32 = 1e-5;

/// Unclamped linear interpolation.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where `value` sits between `a` and `b`, clamped to `[0, 1]`.
///
/// `a > b` is allowed and inverts the ramp.  A degenerate range (`a == b`)
/// returns `0.0`.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Wrap `t` into `[0, length)`.  Returns `0.0` for non-positive lengths.
#[inline]
pub fn repeat(t: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let wrapped = t.rem_euclid(length);
    // rem_euclid can round up to `length` for tiny negative inputs.
    if wrapped >= length { 0.0 } else { wrapped }
}

/// Unsigned angle between two vectors in degrees.  Zero-length input yields 0.
pub fn angle_between_deg(a: Vec3, b: Vec3) -> f32 {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom < EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Uniform Catmull-Rom interpolation between `p1` and `p2` at `t ∈ [0, 1]`.
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Yaw-only rotation whose forward (+Z) axis points along `forward`.
///
/// Falls back to identity when `forward` has no horizontal component.
pub fn yaw_rotation(forward: Vec3) -> Quat {
    let flat = Vec3::new(forward.x, 0.0, forward.z);
    if flat.length_squared() < EPSILON {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_y(flat.x.atan2(flat.z))
}
