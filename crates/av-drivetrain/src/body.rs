//! The physics-engine seam.
//!
//! The drivetrain never integrates motion itself.  It reads the rigid body
//! and writes per-wheel commands through [`VehicleBody`]; whatever engine
//! hosts the vehicle does the rest.

use av_core::{Quat, Vec3};

use crate::{DriveType, DrivetrainError};

/// Number of wheels on every vehicle.
pub const WHEEL_COUNT: usize = 4;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Wheel {
    FrontLeft  = 0,
    FrontRight = 1,
    RearLeft   = 2,
    RearRight  = 3,
}

impl Wheel {
    pub const ALL: [Wheel; WHEEL_COUNT] =
        [Wheel::FrontLeft, Wheel::FrontRight, Wheel::RearLeft, Wheel::RearRight];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_front(self) -> bool {
        matches!(self, Wheel::FrontLeft | Wheel::FrontRight)
    }

    /// Whether `drive` sends engine torque to this wheel.
    #[inline]
    pub fn is_driven(self, drive: DriveType) -> bool {
        match drive {
            DriveType::FourWheel  => true,
            DriveType::FrontWheel => self.is_front(),
            DriveType::RearWheel  => !self.is_front(),
        }
    }
}

impl DriveType {
    /// Wheels receiving torque under this layout.
    pub fn driven_wheels(self) -> impl Iterator<Item = Wheel> {
        Wheel::ALL.into_iter().filter(move |w| w.is_driven(self))
    }
}

impl TryFrom<usize> for Wheel {
    type Error = DrivetrainError;

    fn try_from(i: usize) -> Result<Self, Self::Error> {
        Wheel::ALL
            .get(i)
            .copied()
            .ok_or(DrivetrainError::WheelIndex(i, WHEEL_COUNT))
    }
}

/// Tire contact reported by the physics engine.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WheelHit {
    pub forward_slip:  f32,
    pub sideways_slip: f32,
}

/// What the drivetrain wants one wheel to do this tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WheelCommand {
    /// Degrees, positive to the right.
    pub steer_angle:  f32,
    /// N·m, negative drives backwards.
    pub motor_torque: f32,
    pub brake_torque: f32,
}

/// Read/write surface of a wheeled rigid body.
pub trait VehicleBody {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    /// World-space velocity, m/s.
    fn linear_velocity(&self) -> Vec3;
    /// World-space angular velocity, rad/s.
    fn angular_velocity(&self) -> Vec3;

    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn set_steer_angle(&mut self, wheel: Wheel, degrees: f32);
    fn set_motor_torque(&mut self, wheel: Wheel, torque: f32);
    fn set_brake_torque(&mut self, wheel: Wheel, torque: f32);

    /// Ground contact of `wheel`, `None` while airborne.
    fn ground_hit(&self, wheel: Wheel) -> Option<WheelHit>;

    /// Push the body down with `force` newtons.
    fn apply_downforce(&mut self, force: f32);

    /// Unit heading.
    fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    /// Velocity component along the heading; negative while reversing.
    fn forward_speed(&self) -> f32 {
        self.linear_velocity().dot(self.forward())
    }
}
