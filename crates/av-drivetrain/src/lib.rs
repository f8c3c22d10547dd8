//! `av-drivetrain` — turns normalized driver controls into wheel commands.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                       |
//! |----------------|----------------------------------------------------------------|
//! | [`config`]     | `DrivetrainConfig`, `DriveType`, `SpeedUnit`                   |
//! | [`body`]       | `VehicleBody` physics seam, `Wheel`, `WheelHit`, `WheelCommand` |
//! | [`drivetrain`] | `Drivetrain` — gearing, braking, traction control, speed cap   |
//! | [`error`]      | `DrivetrainError`, `DrivetrainResult<T>`                       |
//!
//! # Units
//!
//! Torques are N·m and velocities m/s.  Only `top_speed` and
//! `brake_speed_threshold` are in the configured [`SpeedUnit`]; the
//! conversion is for presentation and never changes the physics.

pub mod body;
pub mod config;
pub mod drivetrain;
pub mod error;

#[cfg(test)]
mod tests;

pub use body::{VehicleBody, WHEEL_COUNT, Wheel, WheelCommand, WheelHit};
pub use config::{DriveType, DrivetrainConfig, SpeedUnit};
pub use drivetrain::{Drivetrain, Motion};
pub use error::{DrivetrainError, DrivetrainResult};
