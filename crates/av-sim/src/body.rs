//! Bodies the simulation can step.
//!
//! A host physics engine integrates its own bodies, so [`SimBody::integrate`]
//! defaults to doing nothing.  [`KinematicBody`] is a self-contained bicycle
//! model for running without one.

use av_core::{Quat, Vec3};
use av_drivetrain::{VehicleBody, WHEEL_COUNT, Wheel, WheelHit};

const GRAVITY: f32 = 9.81;

/// A [`VehicleBody`] the tick loop advances once all agents have written
/// their wheel commands.
pub trait SimBody: VehicleBody {
    fn integrate(&mut self, _dt: f32) {}
}

/// Flat-ground bicycle model.
///
/// Longitudinal speed follows the summed wheel torques; yaw follows the
/// front steer angle.  Tire grip is a single friction coefficient, and any
/// drive force above it is reported as forward slip.
#[derive(Clone, Debug)]
pub struct KinematicBody {
    pub position:     Vec3,
    /// Heading about +Y, radians; `0` faces +Z.
    pub yaw:          f32,
    /// Signed speed along the heading, m/s.
    pub speed:        f32,
    pub mass:         f32,
    pub wheel_radius: f32,
    pub wheelbase:    f32,
    /// Linear drag per m/s.
    pub drag:         f32,
    /// Tire friction coefficient.
    pub grip:         f32,
    /// No wheel touches the ground while set.
    pub airborne:     bool,

    steer_deg: f32,
    yaw_rate:  f32,
    motor:     [f32; WHEEL_COUNT],
    brake:     [f32; WHEEL_COUNT],
    downforce: f32,
}

impl KinematicBody {
    /// A mid-size car at rest at `position`, facing `forward`.
    pub fn at(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            yaw:          forward.x.atan2(forward.z),
            speed:        0.0,
            mass:         1_500.0,
            wheel_radius: 0.35,
            wheelbase:    2.7,
            drag:         0.05,
            grip:         1.0,
            airborne:     false,
            steer_deg:    0.0,
            yaw_rate:     0.0,
            motor:        [0.0; WHEEL_COUNT],
            brake:        [0.0; WHEEL_COUNT],
            downforce:    0.0,
        }
    }

    /// Front steer angle last written, degrees.
    #[inline]
    pub fn steer_angle(&self) -> f32 {
        self.steer_deg
    }

    #[inline]
    pub fn motor_torque(&self, wheel: Wheel) -> f32 {
        self.motor[wheel.index()]
    }

    #[inline]
    pub fn brake_torque(&self, wheel: Wheel) -> f32 {
        self.brake[wheel.index()]
    }

    /// Downforce applied this tick, newtons.
    #[inline]
    pub fn downforce(&self) -> f32 {
        self.downforce
    }

    /// Friction limit of one tire, newtons.
    fn tire_grip(&self) -> f32 {
        self.grip * (self.mass * GRAVITY + self.downforce) / WHEEL_COUNT as f32
    }
}

impl VehicleBody for KinematicBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    fn linear_velocity(&self) -> Vec3 {
        self.forward() * self.speed
    }

    fn angular_velocity(&self) -> Vec3 {
        Vec3::Y * self.yaw_rate
    }

    /// Only the component along the heading survives; the model has no
    /// lateral motion.
    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.speed = velocity.dot(self.forward());
    }

    fn set_steer_angle(&mut self, wheel: Wheel, degrees: f32) {
        if wheel.is_front() {
            self.steer_deg = degrees;
        }
    }

    fn set_motor_torque(&mut self, wheel: Wheel, torque: f32) {
        self.motor[wheel.index()] = torque;
    }

    fn set_brake_torque(&mut self, wheel: Wheel, torque: f32) {
        self.brake[wheel.index()] = torque;
    }

    fn ground_hit(&self, wheel: Wheel) -> Option<WheelHit> {
        if self.airborne {
            return None;
        }
        let grip = self.tire_grip();
        let force = (self.motor[wheel.index()] / self.wheel_radius).abs();
        let forward_slip = if grip > 0.0 { ((force - grip) / grip).max(0.0) } else { 0.0 };
        Some(WheelHit { forward_slip, sideways_slip: 0.0 })
    }

    fn apply_downforce(&mut self, force: f32) {
        self.downforce = force.max(0.0);
    }
}

impl SimBody for KinematicBody {
    fn integrate(&mut self, dt: f32) {
        if !self.airborne {
            let grip = self.tire_grip();
            let drive: f32 = self
                .motor
                .iter()
                .map(|t| (t / self.wheel_radius).clamp(-grip, grip))
                .sum();
            self.speed += (drive / self.mass - self.drag * self.speed) * dt;

            let brake: f32 = self.brake.iter().map(|t| t.abs() / self.wheel_radius).sum();
            let slowdown = brake / self.mass * dt;
            if self.speed.abs() <= slowdown {
                self.speed = 0.0;
            } else {
                self.speed -= slowdown * self.speed.signum();
            }
        }

        self.yaw_rate = self.speed / self.wheelbase * self.steer_deg.to_radians().tan();
        self.yaw += self.yaw_rate * dt;
        self.position += self.forward() * self.speed * dt;
    }
}
