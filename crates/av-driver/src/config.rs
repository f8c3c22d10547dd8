//! Driver tuning.

use av_graph::{RouteConfig, TrackerConfig};

use crate::{DriverError, DriverResult};

/// How the Normal state slows down for what lies ahead.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BrakePolicy {
    /// Slow for the angle between the heading and the route direction at
    /// the look-ahead target, or for fast rotation.
    #[default]
    TargetDirectionDifference,
    /// Slow as the look-ahead target gets close, or for fast rotation.
    TargetDistance,
    /// Always aim for top speed.
    NeverBrake,
}

/// Shape of the reservation an agent claims ahead of itself.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReservationShape {
    /// Distance ahead at standstill.
    pub lookahead_base:         f32,
    /// Extra distance ahead per m/s.
    pub lookahead_speed_factor: f32,
    pub base_radius:            f32,
    /// Radius per m/s once it exceeds `base_radius`.
    pub radius_speed_scale:     f32,
}

impl Default for ReservationShape {
    fn default() -> Self {
        Self {
            lookahead_base:         4.0,
            lookahead_speed_factor: 0.5,
            base_radius:            2.0,
            radius_speed_scale:     0.25,
        }
    }
}

impl ReservationShape {
    /// Radius claimed at `speed_mps`.
    #[inline]
    pub fn radius(&self, speed_mps: f32) -> f32 {
        self.base_radius.max(speed_mps.abs() * self.radius_speed_scale)
    }

    #[inline]
    pub fn lookahead(&self, speed_mps: f32) -> f32 {
        self.lookahead_base + speed_mps.abs() * self.lookahead_speed_factor
    }
}

/// All seconds are simulated seconds; speeds are m/s.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    pub brake_policy:            BrakePolicy,
    /// Fraction of top speed aimed for at full caution.
    pub cautious_speed_factor:   f32,
    /// Angle, degrees, at which caution saturates.
    pub cautious_max_angle:      f32,
    /// Target distance at which caution starts (distance policy).
    pub cautious_max_distance:   f32,
    /// Degrees of caution per rad/s of rotation.
    pub cautious_angular_factor: f32,

    pub steer_sensitivity:       f32,
    pub accel_sensitivity:       f32,
    pub brake_sensitivity:       f32,

    /// View cone, degrees, used to pick the first node of a new route.
    pub view_angle:              f32,
    /// Dwell in Park before trying to route.
    pub park_duration:           f32,

    /// Below this speed the stuck timer runs.
    pub stuck_speed:             f32,
    pub stuck_time:              f32,

    /// Signed; negative backs up.
    pub reverse_speed:           f32,
    pub reverse_min_duration:    f32,
    pub reverse_max_duration:    f32,
    /// After the minimum, reversing ends once slower than this.
    pub stopped_speed:           f32,

    /// Lateral target shift while overtaking.
    pub overtake_offset:         f32,
    pub overtake_duration:       f32,
    /// Speed multiplier while a racer holds its lane behind someone.
    pub block_slowdown:          f32,
    /// Commuters slower than this give way instead of overtaking.
    pub yield_speed:             f32,

    pub emergency_stop_duration: f32,

    pub reservation:             ReservationShape,
    pub tracker:                 TrackerConfig,
    pub route:                   RouteConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            brake_policy:            BrakePolicy::TargetDirectionDifference,
            cautious_speed_factor:   0.05,
            cautious_max_angle:      50.0,
            cautious_max_distance:   100.0,
            cautious_angular_factor: 30.0,
            steer_sensitivity:       0.05,
            accel_sensitivity:       0.04,
            brake_sensitivity:       1.0,
            view_angle:              90.0,
            park_duration:           2.0,
            stuck_speed:             0.5,
            stuck_time:              3.0,
            reverse_speed:           -3.0,
            reverse_min_duration:    1.0,
            reverse_max_duration:    3.0,
            stopped_speed:           0.3,
            overtake_offset:         3.0,
            overtake_duration:       2.0,
            block_slowdown:          0.5,
            yield_speed:             2.0,
            emergency_stop_duration: 2.0,
            reservation:             ReservationShape::default(),
            tracker:                 TrackerConfig::default(),
            route:                   RouteConfig::default(),
        }
    }
}

impl DriverConfig {
    /// # Errors
    ///
    /// `Config` naming the first offending field.
    pub fn validate(&self) -> DriverResult<()> {
        fn check(ok: bool, what: &str) -> DriverResult<()> {
            if ok { Ok(()) } else { Err(DriverError::Config(what.to_owned())) }
        }
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;
        let positive     = |v: f32| v.is_finite() && v > 0.0;

        check(
            (0.0..=1.0).contains(&self.cautious_speed_factor),
            "cautious_speed_factor must be in [0, 1]",
        )?;
        check(positive(self.cautious_max_angle), "cautious_max_angle must be positive")?;
        check(positive(self.cautious_max_distance), "cautious_max_distance must be positive")?;
        check(non_negative(self.cautious_angular_factor), "cautious_angular_factor must be >= 0")?;
        check(positive(self.steer_sensitivity), "steer_sensitivity must be positive")?;
        check(positive(self.accel_sensitivity), "accel_sensitivity must be positive")?;
        check(positive(self.brake_sensitivity), "brake_sensitivity must be positive")?;
        check(
            self.view_angle.is_finite() && self.view_angle > 0.0 && self.view_angle <= 360.0,
            "view_angle must be in (0, 360]",
        )?;
        check(non_negative(self.park_duration), "park_duration must be >= 0")?;
        check(non_negative(self.stuck_speed), "stuck_speed must be >= 0")?;
        check(non_negative(self.stuck_time), "stuck_time must be >= 0")?;
        check(
            self.reverse_speed.is_finite() && self.reverse_speed < 0.0,
            "reverse_speed must be negative",
        )?;
        check(
            non_negative(self.reverse_min_duration)
                && self.reverse_max_duration.is_finite()
                && self.reverse_max_duration >= self.reverse_min_duration,
            "reverse durations must satisfy 0 <= min <= max",
        )?;
        check(non_negative(self.stopped_speed), "stopped_speed must be >= 0")?;
        check(non_negative(self.overtake_offset), "overtake_offset must be >= 0")?;
        check(non_negative(self.overtake_duration), "overtake_duration must be >= 0")?;
        check((0.0..=1.0).contains(&self.block_slowdown), "block_slowdown must be in [0, 1]")?;
        check(non_negative(self.yield_speed), "yield_speed must be >= 0")?;
        check(non_negative(self.emergency_stop_duration), "emergency_stop_duration must be >= 0")?;
        check(
            (0.0..=1.0).contains(&self.route.greedy_probability),
            "route.greedy_probability must be in [0, 1]",
        )?;
        check(
            positive(self.reservation.base_radius),
            "reservation.base_radius must be positive",
        )?;
        check(
            non_negative(self.reservation.lookahead_base)
                && non_negative(self.reservation.lookahead_speed_factor)
                && non_negative(self.reservation.radius_speed_scale),
            "reservation lookahead and scale must be >= 0",
        )?;
        check(
            non_negative(self.tracker.lookahead_offset)
                && non_negative(self.tracker.lookahead_speed_factor)
                && non_negative(self.tracker.arrival_radius),
            "tracker distances must be >= 0",
        )?;
        Ok(())
    }
}
