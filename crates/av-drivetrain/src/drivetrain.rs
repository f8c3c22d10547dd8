//! Per-vehicle drivetrain state and the per-tick control sequence.
//!
//! # Tick sequence ([`Drivetrain::step`])
//!
//! ```text
//! controls ─► kick-start timer ─► compute_drive ─► wheels
//!                                                   │
//! body velocity ─► cap_speed ─► revs ─► update_gear ─► downforce ─► traction_control
//! ```
//!
//! Traction control runs last and only changes `current_torque`, so a slip
//! detected this tick shapes the torque computed next tick.

use av_core::math::{angle_between_deg, inverse_lerp, lerp};
use av_core::{Controls, Vec3};
use tracing::trace;

use crate::{
    DrivetrainConfig, DrivetrainResult, VehicleBody, WHEEL_COUNT, Wheel, WheelCommand,
    WheelHit,
};

/// Share of full torque cut per unit of slip severity.
const TRACTION_STEP: f32 = 0.1;

/// Rate at which the in-gear rev factor follows its target, per second.
const GEAR_FACTOR_RATE: f32 = 5.0;

/// Rigid-body motion summary used by [`Drivetrain::compute_drive`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Motion {
    /// Speed magnitude, m/s.
    pub speed_mps:      f32,
    /// Fast enough, and heading close enough to the velocity, that the brake
    /// pedal brakes instead of selecting reverse.
    pub moving_forward: bool,
}

#[derive(Clone, Debug)]
pub struct Drivetrain {
    config:         DrivetrainConfig,
    gear:           usize,
    current_torque: f32,
    gear_factor:    f32,
    revs:           f32,
    kick_remaining: f32,
    was_throttling: bool,
}

impl Drivetrain {
    /// # Errors
    ///
    /// `Config` if `config` fails [`DrivetrainConfig::validate`].
    pub fn new(config: DrivetrainConfig) -> DrivetrainResult<Self> {
        config.validate()?;
        Ok(Self {
            current_torque: config.full_torque,
            config,
            gear:           0,
            gear_factor:    0.0,
            revs:           0.0,
            kick_remaining: 0.0,
            was_throttling: false,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &DrivetrainConfig {
        &self.config
    }

    /// Zero-based forward gear.
    #[inline]
    pub fn gear(&self) -> usize {
        self.gear
    }

    /// Engine torque after traction control, before gearing.
    #[inline]
    pub fn current_torque(&self) -> f32 {
        self.current_torque
    }

    /// Normalized engine revs in `[0, 1]`, for audio.
    #[inline]
    pub fn revs(&self) -> f32 {
        self.revs
    }

    #[inline]
    pub fn top_speed_mps(&self) -> f32 {
        self.config.top_speed_mps()
    }

    #[inline]
    pub fn kick_start_active(&self) -> bool {
        self.kick_remaining > 0.0
    }

    /// Number of wheels receiving engine torque.
    pub fn driven_wheel_count(&self) -> usize {
        self.config.drive_type.driven_wheels().count()
    }

    /// Speed as a fraction of top speed.
    #[inline]
    pub fn speed_fraction(&self, speed_mps: f32) -> f32 {
        (speed_mps / self.top_speed_mps()).abs()
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Run one tick against `body` and return what each wheel was told.
    pub fn step<B: VehicleBody + ?Sized>(
        &mut self,
        controls: &Controls,
        body:     &mut B,
        dt:       f32,
    ) -> [WheelCommand; WHEEL_COUNT] {
        let controls = controls.clamped();
        let motion = self.motion(&*body);

        self.update_kick_start(controls.throttle, motion.speed_mps, dt);
        let commands = self.compute_drive(&controls, motion);
        for wheel in Wheel::ALL {
            let cmd = commands[wheel.index()];
            if wheel.is_front() {
                body.set_steer_angle(wheel, cmd.steer_angle);
            }
            body.set_motor_torque(wheel, cmd.motor_torque);
            body.set_brake_torque(wheel, cmd.brake_torque);
        }

        if let Some(capped) = self.cap_speed(body.linear_velocity()) {
            body.set_linear_velocity(capped);
        }

        let fraction = self.speed_fraction(motion.speed_mps);
        self.update_revs(fraction, dt);
        self.update_gear(fraction);

        body.apply_downforce(self.config.downforce * body.linear_velocity().length());

        let hits = Wheel::ALL.map(|w| body.ground_hit(w));
        self.traction_control(&hits);

        commands
    }

    /// Summarize the body's motion relative to its heading.
    pub fn motion<B: VehicleBody + ?Sized>(&self, body: &B) -> Motion {
        let velocity = body.linear_velocity();
        let speed_mps = velocity.length();
        let shown = self.config.speed_unit.from_mps(speed_mps);
        let moving_forward = shown > self.config.brake_speed_threshold
            && angle_between_deg(body.forward(), velocity) < self.config.forward_angle_limit;
        Motion { speed_mps, moving_forward }
    }

    // ── Drive ─────────────────────────────────────────────────────────────

    /// Per-wheel steer, motor and brake torque for `controls`.
    ///
    /// The brake pedal brakes while rolling forward and otherwise drives the
    /// driven wheels backwards.  The handbrake acts on every wheel and blocks
    /// reverse.
    pub fn compute_drive(&self, controls: &Controls, motion: Motion) -> [WheelCommand; WHEEL_COUNT] {
        let c = controls.clamped();
        let cfg = &self.config;
        let drive = cfg.drive_type;

        let boost = if self.kick_start_active() { cfg.kick_start_multiplier } else { 1.0 };
        let total = self.current_torque * cfg.gear_ratios[self.gear] * cfg.final_drive;
        let per_wheel = total / self.driven_wheel_count() as f32 * c.throttle * boost;
        let steer = c.steering * cfg.max_steer_angle;

        Wheel::ALL.map(|wheel| {
            let driven = wheel.is_driven(drive);
            let mut cmd = WheelCommand {
                steer_angle:  if wheel.is_front() { steer } else { 0.0 },
                motor_torque: if driven { per_wheel } else { 0.0 },
                brake_torque: 0.0,
            };
            if motion.moving_forward {
                cmd.brake_torque = cfg.brake_torque * c.brake;
            } else if c.brake > 0.0 && c.handbrake <= 0.0 && driven {
                cmd.motor_torque = -cfg.reverse_torque * c.brake;
            }
            cmd.brake_torque += cfg.handbrake_torque * c.handbrake;
            cmd
        })
    }

    fn update_kick_start(&mut self, throttle: f32, speed_mps: f32, dt: f32) {
        self.kick_remaining = (self.kick_remaining - dt).max(0.0);
        let throttling = throttle > 0.0;
        if throttling
            && !self.was_throttling
            && speed_mps < self.config.kick_start_speed
            && self.config.kick_start_duration > 0.0
        {
            self.kick_remaining = self.config.kick_start_duration;
            trace!(duration = self.config.kick_start_duration, "kick-start");
        }
        self.was_throttling = throttling;
    }

    // ── Gearing ───────────────────────────────────────────────────────────

    /// Shift at most one gear so that `speed_fraction` falls in the current
    /// gear's band.  Gear `g` of `n` covers `[g / n, (g + 1) / n]`.
    pub fn update_gear(&mut self, speed_fraction: f32) {
        let n = self.config.gear_count();
        let f = speed_fraction.abs();
        let down = self.gear as f32 / n as f32;
        let up = (self.gear + 1) as f32 / n as f32;

        let before = self.gear;
        if self.gear > 0 && f < down {
            self.gear -= 1;
        } else if f > up && self.gear + 1 < n {
            self.gear += 1;
        }
        if self.gear != before {
            trace!(from = before, to = self.gear, speed_fraction = f, "gear change");
        }
    }

    fn update_revs(&mut self, speed_fraction: f32, dt: f32) {
        let n = self.config.gear_count() as f32;
        let band = 1.0 / n;
        let g = self.gear as f32;

        let target = inverse_lerp(band * g, band * (g + 1.0), speed_fraction);
        self.gear_factor = lerp(self.gear_factor, target, (dt * GEAR_FACTOR_RATE).clamp(0.0, 1.0));

        let gear_position = g / n;
        let boundary = self.config.rev_range_boundary;
        let min = lerp(0.0, boundary, curve_factor(gear_position));
        let max = lerp(boundary, 1.0, gear_position);
        self.revs = lerp(min, max, self.gear_factor).clamp(0.0, 1.0);
    }

    // ── Limits ────────────────────────────────────────────────────────────

    /// `velocity` rescaled to top speed if it is faster, else `None`.
    pub fn cap_speed(&self, velocity: Vec3) -> Option<Vec3> {
        let shown = self.config.speed_unit.from_mps(velocity.length());
        (shown > self.config.top_speed)
            .then(|| velocity.normalize_or_zero() * self.top_speed_mps())
    }

    /// Cut torque on wheel spin, restore it once every driven wheel grips.
    ///
    /// Wheels that are not driven or have no ground contact are ignored; with
    /// no driven wheel on the ground the current torque is kept.
    pub fn traction_control(&mut self, hits: &[Option<WheelHit>; WHEEL_COUNT]) {
        let cfg = &self.config;
        if cfg.traction_control <= 0.0 {
            return;
        }
        let mut grounded = false;
        let mut slipped = false;
        let mut torque = self.current_torque;
        for wheel in cfg.drive_type.driven_wheels() {
            let Some(hit) = hits[wheel.index()] else {
                continue;
            };
            grounded = true;
            if hit.forward_slip >= cfg.slip_limit {
                slipped = true;
                let severity = hit.forward_slip / cfg.slip_limit;
                torque -= cfg.traction_control * cfg.full_torque * TRACTION_STEP * severity;
            }
        }
        if !grounded {
            return;
        }
        self.current_torque = if slipped { torque.max(0.0) } else { cfg.full_torque };
        if slipped {
            trace!(torque = self.current_torque, "traction control");
        }
    }
}

/// Ease-out curve: steep near 0, flat near 1.
#[inline]
fn curve_factor(f: f32) -> f32 {
    1.0 - (1.0 - f) * (1.0 - f)
}
