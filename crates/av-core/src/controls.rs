//! Per-tick control outputs handed from the driver to the drivetrain.

/// Normalized driver inputs.
///
/// | Field       | Range      |
/// |-------------|------------|
/// | `steering`  | `[-1, 1]`  |
/// | `throttle`  | `[0, 1]`   |
/// | `brake`     | `[0, 1]`   |
/// | `handbrake` | `[0, 1]`   |
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Controls {
    pub steering:  f32,
    pub throttle:  f32,
    pub brake:     f32,
    pub handbrake: f32,
}

impl Controls {
    /// Everything released.
    pub const IDLE: Controls = Controls { steering: 0.0, throttle: 0.0, brake: 0.0, handbrake: 0.0 };

    /// Held still: wheels straight, both brakes on.
    pub const HOLD: Controls = Controls { steering: 0.0, throttle: 0.0, brake: 1.0, handbrake: 1.0 };

    /// Split a signed acceleration request into throttle and brake.
    pub fn from_accel(steering: f32, accel: f32) -> Self {
        let accel = accel.clamp(-1.0, 1.0);
        Self {
            steering:  steering.clamp(-1.0, 1.0),
            throttle:  accel.max(0.0),
            brake:     (-accel).max(0.0),
            handbrake: 0.0,
        }
    }

    /// Copy with every field forced into its valid range.  NaN becomes 0.
    pub fn clamped(self) -> Self {
        fn unit(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
        }
        Self {
            steering:  if self.steering.is_nan() { 0.0 } else { self.steering.clamp(-1.0, 1.0) },
            throttle:  unit(self.throttle),
            brake:     unit(self.brake),
            handbrake: unit(self.handbrake),
        }
    }
}
