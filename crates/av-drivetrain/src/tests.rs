//! Unit tests for av-drivetrain.

use av_core::{Controls, Quat, Vec3};

use crate::{
    DriveType, Drivetrain, DrivetrainConfig, Motion, VehicleBody, WHEEL_COUNT, Wheel, WheelHit,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Records everything the drivetrain writes.  Heading is +Z.
#[derive(Default)]
struct RecordingBody {
    velocity:  Vec3,
    steer:     [f32; WHEEL_COUNT],
    motor:     [f32; WHEEL_COUNT],
    brake:     [f32; WHEEL_COUNT],
    hits:      [Option<WheelHit>; WHEEL_COUNT],
    downforce: f32,
}

impl RecordingBody {
    fn moving(velocity: Vec3) -> Self {
        Self { velocity, hits: [Some(WheelHit::default()); WHEEL_COUNT], ..Self::default() }
    }
}

impl VehicleBody for RecordingBody {
    fn position(&self) -> Vec3 { Vec3::ZERO }
    fn rotation(&self) -> Quat { Quat::IDENTITY }
    fn linear_velocity(&self) -> Vec3 { self.velocity }
    fn angular_velocity(&self) -> Vec3 { Vec3::ZERO }
    fn set_linear_velocity(&mut self, velocity: Vec3) { self.velocity = velocity; }
    fn set_steer_angle(&mut self, wheel: Wheel, degrees: f32) { self.steer[wheel.index()] = degrees; }
    fn set_motor_torque(&mut self, wheel: Wheel, torque: f32) { self.motor[wheel.index()] = torque; }
    fn set_brake_torque(&mut self, wheel: Wheel, torque: f32) { self.brake[wheel.index()] = torque; }
    fn ground_hit(&self, wheel: Wheel) -> Option<WheelHit> { self.hits[wheel.index()] }
    fn apply_downforce(&mut self, force: f32) { self.downforce = force; }
}

fn drivetrain(drive_type: DriveType) -> Drivetrain {
    Drivetrain::new(DrivetrainConfig { drive_type, ..DrivetrainConfig::default() }).unwrap()
}

const ROLLING: Motion = Motion { speed_mps: 10.0, moving_forward: true };
const STOPPED: Motion = Motion { speed_mps: 0.0, moving_forward: false };

fn slip(forward_slip: f32) -> Option<WheelHit> {
    Some(WheelHit { forward_slip, sideways_slip: 0.0 })
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;
    use crate::{DrivetrainError, SpeedUnit};

    #[test]
    fn default_is_valid() {
        assert!(DrivetrainConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            DrivetrainConfig { gear_ratios: vec![], ..Default::default() },
            DrivetrainConfig { gear_ratios: vec![1.0, 0.0], ..Default::default() },
            DrivetrainConfig { top_speed: 0.0, ..Default::default() },
            DrivetrainConfig { slip_limit: f32::NAN, ..Default::default() },
            DrivetrainConfig { traction_control: 1.5, ..Default::default() },
            DrivetrainConfig { kick_start_multiplier: 0.5, ..Default::default() },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(DrivetrainError::Config(_))), "{cfg:?}");
            assert!(Drivetrain::new(cfg).is_err());
        }
    }

    #[test]
    fn speed_units() {
        assert!((SpeedUnit::Kph.to_mps(36.0) - 10.0).abs() < 1e-5);
        assert!((SpeedUnit::Mph.from_mps(1.0) - 2.236_936_3).abs() < 1e-6);
        let cfg = DrivetrainConfig { top_speed: 72.0, speed_unit: SpeedUnit::Kph, ..Default::default() };
        assert!((cfg.top_speed_mps() - 20.0).abs() < 1e-5);
        assert!((cfg.with_speed_factor(1.5).top_speed - 108.0).abs() < 1e-4);
    }
}

// ── Wheels ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wheels {
    use super::*;
    use crate::DrivetrainError;

    #[test]
    fn driven_sets() {
        assert_eq!(DriveType::FourWheel.driven_wheels().count(), 4);
        let front: Vec<_> = DriveType::FrontWheel.driven_wheels().collect();
        assert_eq!(front, vec![Wheel::FrontLeft, Wheel::FrontRight]);
        let rear: Vec<_> = DriveType::RearWheel.driven_wheels().collect();
        assert_eq!(rear, vec![Wheel::RearLeft, Wheel::RearRight]);
    }

    #[test]
    fn index_conversion() {
        assert_eq!(Wheel::try_from(2).unwrap(), Wheel::RearLeft);
        assert_eq!(Wheel::RearRight.index(), 3);
        assert!(matches!(Wheel::try_from(4), Err(DrivetrainError::WheelIndex(4, 4))));
    }
}

// ── compute_drive ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod drive {
    use super::*;

    // 400 N·m × 3.2 × 3.4
    const FIRST_GEAR_TOTAL: f32 = 4352.0;

    #[test]
    fn torque_split_across_driven_wheels() {
        let full = Controls { throttle: 1.0, ..Controls::IDLE };
        let awd = drivetrain(DriveType::FourWheel).compute_drive(&full, ROLLING);
        for cmd in awd {
            assert!((cmd.motor_torque - FIRST_GEAR_TOTAL / 4.0).abs() < 1e-2);
        }

        let fwd = drivetrain(DriveType::FrontWheel).compute_drive(&full, ROLLING);
        assert!((fwd[0].motor_torque - FIRST_GEAR_TOTAL / 2.0).abs() < 1e-2);
        assert!((fwd[1].motor_torque - FIRST_GEAR_TOTAL / 2.0).abs() < 1e-2);
        assert_eq!(fwd[2].motor_torque, 0.0);
        assert_eq!(fwd[3].motor_torque, 0.0);
    }

    #[test]
    fn torque_scales_with_throttle() {
        let dt = drivetrain(DriveType::RearWheel);
        let half = dt.compute_drive(&Controls { throttle: 0.5, ..Controls::IDLE }, ROLLING);
        assert!((half[2].motor_torque - FIRST_GEAR_TOTAL / 4.0).abs() < 1e-2);
    }

    #[test]
    fn steer_only_front() {
        let cmds = drivetrain(DriveType::FourWheel)
            .compute_drive(&Controls { steering: -0.5, ..Controls::IDLE }, STOPPED);
        assert_eq!(cmds[0].steer_angle, -12.5);
        assert_eq!(cmds[1].steer_angle, -12.5);
        assert_eq!(cmds[2].steer_angle, 0.0);
    }

    #[test]
    fn brake_while_rolling_forward() {
        let cmds = drivetrain(DriveType::FourWheel)
            .compute_drive(&Controls { brake: 0.5, ..Controls::IDLE }, ROLLING);
        for cmd in cmds {
            assert_eq!(cmd.brake_torque, 10_000.0);
            assert_eq!(cmd.motor_torque, 0.0);
        }
    }

    #[test]
    fn brake_while_stopped_reverses() {
        let cmds = drivetrain(DriveType::RearWheel)
            .compute_drive(&Controls { brake: 1.0, ..Controls::IDLE }, STOPPED);
        assert_eq!(cmds[2].motor_torque, -500.0);
        assert_eq!(cmds[3].motor_torque, -500.0);
        assert_eq!(cmds[0].motor_torque, 0.0);
        assert!(cmds.iter().all(|c| c.brake_torque == 0.0));
    }

    #[test]
    fn handbrake_blocks_reverse_and_holds_every_wheel() {
        let controls = Controls { brake: 1.0, handbrake: 1.0, ..Controls::IDLE };
        let cmds = drivetrain(DriveType::FourWheel).compute_drive(&controls, STOPPED);
        for cmd in cmds {
            assert_eq!(cmd.motor_torque, 0.0);
            assert_eq!(cmd.brake_torque, 100_000.0);
        }
    }

    #[test]
    fn out_of_range_controls_are_clamped() {
        let wild = Controls { steering: 9.0, throttle: 3.0, brake: -2.0, handbrake: -1.0 };
        let cmds = drivetrain(DriveType::FourWheel).compute_drive(&wild, ROLLING);
        assert_eq!(cmds[0].steer_angle, 25.0);
        assert!((cmds[0].motor_torque - FIRST_GEAR_TOTAL / 4.0).abs() < 1e-2);
        assert_eq!(cmds[0].brake_torque, 0.0);
    }
}

// ── Gearing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod gearing {
    use super::*;

    #[test]
    fn upshifts_one_gear_per_call() {
        let mut dt = drivetrain(DriveType::FourWheel);
        dt.update_gear(0.5);
        assert_eq!(dt.gear(), 1);
        dt.update_gear(0.5);
        assert_eq!(dt.gear(), 2);
    }

    #[test]
    fn idempotent_at_fixed_fraction() {
        let mut dt = drivetrain(DriveType::FourWheel);
        for _ in 0..10 {
            dt.update_gear(0.5);
        }
        // Five gears: gear 2 covers [0.4, 0.6].
        assert_eq!(dt.gear(), 2);
        dt.update_gear(0.5);
        assert_eq!(dt.gear(), 2);
    }

    #[test]
    fn downshifts_and_clamps() {
        let mut dt = drivetrain(DriveType::FourWheel);
        for _ in 0..10 {
            dt.update_gear(1.0);
        }
        assert_eq!(dt.gear(), 4);
        dt.update_gear(0.05);
        assert_eq!(dt.gear(), 3);
        for _ in 0..10 {
            dt.update_gear(0.0);
        }
        assert_eq!(dt.gear(), 0);
    }

    #[test]
    fn single_gear_never_shifts() {
        let cfg = DrivetrainConfig { gear_ratios: vec![2.0], ..Default::default() };
        let mut dt = Drivetrain::new(cfg).unwrap();
        dt.update_gear(5.0);
        assert_eq!(dt.gear(), 0);
    }
}

// ── Speed cap ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cap_speed {
    use super::*;
    use crate::SpeedUnit;

    #[test]
    fn under_top_speed_is_untouched() {
        let dt = drivetrain(DriveType::FourWheel);
        assert_eq!(dt.cap_speed(Vec3::new(0.0, 0.0, 10.0)), None);
    }

    #[test]
    fn over_top_speed_is_rescaled() {
        let dt = drivetrain(DriveType::FourWheel);
        let capped = dt.cap_speed(Vec3::new(30.0, 0.0, 60.0)).unwrap();
        assert!((capped.length() - dt.top_speed_mps()).abs() < 1e-3);
        // Direction is kept.
        assert!(capped.normalize().dot(Vec3::new(30.0, 0.0, 60.0).normalize()) > 0.9999);
    }

    #[test]
    fn kph_unit() {
        let cfg = DrivetrainConfig { top_speed: 36.0, speed_unit: SpeedUnit::Kph, ..Default::default() };
        let dt = Drivetrain::new(cfg).unwrap();
        assert_eq!(dt.cap_speed(Vec3::new(0.0, 0.0, 9.9)), None);
        let capped = dt.cap_speed(Vec3::new(0.0, 0.0, 12.0)).unwrap();
        assert!((capped.z - 10.0).abs() < 1e-4);
    }
}

// ── Traction control ──────────────────────────────────────────────────────────

#[cfg(test)]
mod traction {
    use super::*;

    #[test]
    fn slip_cuts_torque_by_severity() {
        let mut dt = drivetrain(DriveType::FourWheel);
        // Twice the limit on every wheel: 4 × (400 × 0.1 × 2).
        dt.traction_control(&[slip(0.6); WHEEL_COUNT]);
        assert!((dt.current_torque() - 80.0).abs() < 1e-3);

        dt.traction_control(&[slip(0.9); WHEEL_COUNT]);
        assert_eq!(dt.current_torque(), 0.0);
    }

    #[test]
    fn grip_restores_full_torque() {
        let mut dt = drivetrain(DriveType::FourWheel);
        dt.traction_control(&[slip(0.6); WHEEL_COUNT]);
        dt.traction_control(&[slip(0.1); WHEEL_COUNT]);
        assert_eq!(dt.current_torque(), 400.0);
    }

    #[test]
    fn airborne_wheels_are_skipped() {
        let mut dt = drivetrain(DriveType::FourWheel);
        dt.traction_control(&[slip(0.6), None, None, None]);
        assert!((dt.current_torque() - 320.0).abs() < 1e-3);

        // Fully airborne: the cut holds until a driven wheel lands again.
        dt.traction_control(&[None; WHEEL_COUNT]);
        assert!((dt.current_torque() - 320.0).abs() < 1e-3);
        dt.traction_control(&[None, slip(0.0), None, None]);
        assert_eq!(dt.current_torque(), 400.0);
    }

    #[test]
    fn undriven_wheel_slip_is_ignored() {
        let mut dt = drivetrain(DriveType::RearWheel);
        dt.traction_control(&[slip(5.0), slip(5.0), slip(0.0), slip(0.0)]);
        assert_eq!(dt.current_torque(), 400.0);
    }

    #[test]
    fn disabled_leaves_torque_alone() {
        let cfg = DrivetrainConfig { traction_control: 0.0, ..Default::default() };
        let mut dt = Drivetrain::new(cfg).unwrap();
        dt.traction_control(&[slip(5.0); WHEEL_COUNT]);
        assert_eq!(dt.current_torque(), 400.0);
    }
}

// ── step ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod step {
    use super::*;

    #[test]
    fn motion_classification() {
        let dt = drivetrain(DriveType::FourWheel);
        assert!(dt.motion(&RecordingBody::moving(Vec3::new(0.0, 0.0, 10.0))).moving_forward);
        // Reversing.
        assert!(!dt.motion(&RecordingBody::moving(Vec3::new(0.0, 0.0, -10.0))).moving_forward);
        // Sliding sideways.
        assert!(!dt.motion(&RecordingBody::moving(Vec3::new(10.0, 0.0, 1.0))).moving_forward);
        // Below 5 mph.
        assert!(!dt.motion(&RecordingBody::moving(Vec3::new(0.0, 0.0, 2.0))).moving_forward);
    }

    #[test]
    fn pulling_away_applies_kick_start() {
        let mut dt = drivetrain(DriveType::FourWheel);
        let mut body = RecordingBody::moving(Vec3::ZERO);
        let go = Controls { throttle: 1.0, ..Controls::IDLE };

        dt.step(&go, &mut body, 0.02);
        assert!(dt.kick_start_active());
        assert!((body.motor[0] - 4352.0 / 4.0 * 1.5).abs() < 1e-2);

        // Boost expires after its duration even with the throttle held.
        for _ in 0..30 {
            dt.step(&go, &mut body, 0.02);
        }
        assert!(!dt.kick_start_active());
        assert!((body.motor[0] - 4352.0 / 4.0).abs() < 1e-2);
    }

    #[test]
    fn writes_body_and_caps_speed() {
        let mut dt = drivetrain(DriveType::FourWheel);
        let mut body = RecordingBody::moving(Vec3::new(0.0, 0.0, 100.0));
        let controls = Controls { steering: 1.0, brake: 0.2, ..Controls::IDLE };
        let cmds = dt.step(&controls, &mut body, 0.02);

        assert_eq!(body.steer[0], 25.0);
        assert_eq!(body.brake, cmds.map(|c| c.brake_torque));
        assert!((body.velocity.length() - dt.top_speed_mps()).abs() < 1e-3);
        assert!((body.downforce - 100.0 * dt.top_speed_mps()).abs() < 1e-2);
    }

    #[test]
    fn revs_rise_with_speed_and_stay_normalized() {
        let mut dt = drivetrain(DriveType::FourWheel);
        let mut body = RecordingBody::moving(Vec3::new(0.0, 0.0, 2.0));
        for _ in 0..50 {
            dt.step(&Controls::IDLE, &mut body, 0.02);
        }
        let slow = dt.revs();
        body.velocity = Vec3::new(0.0, 0.0, 25.0);
        for _ in 0..50 {
            dt.step(&Controls::IDLE, &mut body, 0.02);
        }
        assert!(dt.revs() > slow);
        assert!((0.0..=1.0).contains(&dt.revs()));
        assert!(dt.gear() > 0);
    }
}
