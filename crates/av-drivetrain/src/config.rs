//! Drivetrain tuning.

use crate::{DrivetrainError, DrivetrainResult};

/// Which axles receive engine torque.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriveType {
    #[default]
    FourWheel,
    FrontWheel,
    RearWheel,
}

/// Unit that `top_speed` and `brake_speed_threshold` are expressed in.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpeedUnit {
    #[default]
    Mph,
    Kph,
}

impl SpeedUnit {
    /// Multiply m/s by this to get the unit.
    #[inline]
    pub fn per_mps(self) -> f32 {
        match self {
            SpeedUnit::Mph => 2.236_936_3,
            SpeedUnit::Kph => 3.6,
        }
    }

    #[inline]
    pub fn from_mps(self, mps: f32) -> f32 {
        mps * self.per_mps()
    }

    #[inline]
    pub fn to_mps(self, value: f32) -> f32 {
        value / self.per_mps()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DrivetrainConfig {
    pub drive_type:            DriveType,
    /// Front-wheel steer angle at full lock, degrees.
    pub max_steer_angle:       f32,
    /// Engine torque before gearing, N·m.
    pub full_torque:           f32,
    /// One ratio per forward gear, lowest gear first.
    pub gear_ratios:           Vec<f32>,
    pub final_drive:           f32,
    pub reverse_torque:        f32,
    pub brake_torque:          f32,
    pub handbrake_torque:      f32,
    /// Above this speed (in `speed_unit`) and rolling forward, the brake
    /// pedal brakes; below it the pedal selects reverse.
    pub brake_speed_threshold: f32,
    /// Max angle, degrees, between velocity and heading that still counts as
    /// rolling forward.
    pub forward_angle_limit:   f32,
    /// Forward slip at which traction control starts cutting torque.
    pub slip_limit:            f32,
    /// Traction control strength, `0` disables it.
    pub traction_control:      f32,
    /// Downward force per m/s of speed.
    pub downforce:             f32,
    /// Speed cap in `speed_unit`.
    pub top_speed:             f32,
    pub speed_unit:            SpeedUnit,
    /// Share of the rev range reserved for the lowest gear's floor.
    pub rev_range_boundary:    f32,
    /// Torque multiplier while pulling away from standstill.
    pub kick_start_multiplier: f32,
    /// Seconds the kick-start boost lasts.
    pub kick_start_duration:   f32,
    /// Pulling away below this speed (m/s) triggers the kick-start.
    pub kick_start_speed:      f32,
}

impl Default for DrivetrainConfig {
    fn default() -> Self {
        Self {
            drive_type:            DriveType::FourWheel,
            max_steer_angle:       25.0,
            full_torque:           400.0,
            gear_ratios:           vec![3.2, 2.1, 1.5, 1.1, 0.9],
            final_drive:           3.4,
            reverse_torque:        500.0,
            brake_torque:          20_000.0,
            handbrake_torque:      100_000.0,
            brake_speed_threshold: 5.0,
            forward_angle_limit:   50.0,
            slip_limit:            0.3,
            traction_control:      1.0,
            downforce:             100.0,
            top_speed:             60.0,
            speed_unit:            SpeedUnit::Mph,
            rev_range_boundary:    1.0,
            kick_start_multiplier: 1.5,
            kick_start_duration:   0.5,
            kick_start_speed:      1.0,
        }
    }
}

impl DrivetrainConfig {
    /// Number of forward gears.
    #[inline]
    pub fn gear_count(&self) -> usize {
        self.gear_ratios.len()
    }

    /// `top_speed` converted to m/s.
    #[inline]
    pub fn top_speed_mps(&self) -> f32 {
        self.speed_unit.to_mps(self.top_speed)
    }

    /// Copy with the top speed scaled by `factor`.
    pub fn with_speed_factor(mut self, factor: f32) -> Self {
        self.top_speed *= factor;
        self
    }

    /// # Errors
    ///
    /// `Config` naming the first offending field.
    pub fn validate(&self) -> DrivetrainResult<()> {
        fn check(ok: bool, what: &str) -> DrivetrainResult<()> {
            if ok { Ok(()) } else { Err(DrivetrainError::Config(what.to_owned())) }
        }
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;
        let positive     = |v: f32| v.is_finite() && v > 0.0;

        check(!self.gear_ratios.is_empty(), "gear_ratios must not be empty")?;
        check(self.gear_ratios.iter().all(|&r| positive(r)), "gear_ratios must be positive")?;
        check(positive(self.final_drive), "final_drive must be positive")?;
        check(positive(self.top_speed), "top_speed must be positive")?;
        check(positive(self.slip_limit), "slip_limit must be positive")?;
        check(non_negative(self.full_torque), "full_torque must be >= 0")?;
        check(non_negative(self.reverse_torque), "reverse_torque must be >= 0")?;
        check(non_negative(self.brake_torque), "brake_torque must be >= 0")?;
        check(non_negative(self.handbrake_torque), "handbrake_torque must be >= 0")?;
        check(non_negative(self.max_steer_angle), "max_steer_angle must be >= 0")?;
        check(non_negative(self.brake_speed_threshold), "brake_speed_threshold must be >= 0")?;
        check(non_negative(self.downforce), "downforce must be >= 0")?;
        check(
            (0.0..=180.0).contains(&self.forward_angle_limit),
            "forward_angle_limit must be in [0, 180]",
        )?;
        check((0.0..=1.0).contains(&self.traction_control), "traction_control must be in [0, 1]")?;
        check((0.0..=1.0).contains(&self.rev_range_boundary), "rev_range_boundary must be in [0, 1]")?;
        check(
            self.kick_start_multiplier.is_finite() && self.kick_start_multiplier >= 1.0,
            "kick_start_multiplier must be >= 1",
        )?;
        check(non_negative(self.kick_start_duration), "kick_start_duration must be >= 0")?;
        check(non_negative(self.kick_start_speed), "kick_start_speed must be >= 0")?;
        Ok(())
    }
}
