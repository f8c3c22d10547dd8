//! One vehicle: driver, drivetrain, body and RNG stream.

use av_core::{AgentId, AgentRng, BehaviorProfile, Controls, ExperienceLevel};
use av_driver::{DriveContext, Driver, DriverConfig, DriverEvent, DrivingState, Perception};
use av_drivetrain::{Drivetrain, DrivetrainConfig, VehicleBody, WHEEL_COUNT, WheelCommand};
use av_graph::WaypointGraph;
use av_reservation::ReservationGrid;

use crate::SimResult;

/// Everything needed to author one vehicle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentSpec {
    pub profile:    BehaviorProfile,
    pub experience: ExperienceLevel,
    pub driver:     DriverConfig,
    /// Base tuning; the top speed is scaled by the profile's speed factor.
    pub drivetrain: DrivetrainConfig,
}

impl AgentSpec {
    pub fn new(profile: BehaviorProfile, experience: ExperienceLevel) -> Self {
        Self { profile, experience, ..Self::default() }
    }

    /// The drivetrain tuning this vehicle actually runs with.
    pub fn effective_drivetrain(&self) -> DrivetrainConfig {
        self.drivetrain.clone().with_speed_factor(self.profile.speed_factor())
    }

    /// Largest reservation radius this vehicle can claim.
    pub fn max_reservation_radius(&self) -> f32 {
        self.driver.reservation.radius(self.effective_drivetrain().top_speed_mps())
    }
}

/// Composition root for a single vehicle.
pub struct VehicleAgent<B> {
    id:         AgentId,
    driver:     Driver,
    drivetrain: Drivetrain,
    body:       B,
    rng:        AgentRng,
    controls:   Controls,
    wheels:     [WheelCommand; WHEEL_COUNT],
}

impl<B: VehicleBody> VehicleAgent<B> {
    /// # Errors
    ///
    /// `Driver` or `Drivetrain` if the tuning fails validation.
    pub fn new(id: AgentId, spec: AgentSpec, body: B, seed: u64) -> SimResult<Self> {
        let drivetrain = Drivetrain::new(spec.effective_drivetrain())?;
        let driver = Driver::new(id, spec.driver, spec.profile, spec.experience)?;
        Ok(Self {
            id,
            driver,
            drivetrain,
            body,
            rng: AgentRng::new(seed, id),
            controls: Controls::HOLD,
            wheels: [WheelCommand::default(); WHEEL_COUNT],
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// Mutable access for authoring commands such as
    /// [`Driver::assign_route`].
    #[inline]
    pub fn driver_mut(&mut self) -> &mut Driver {
        &mut self.driver
    }

    #[inline]
    pub fn drivetrain(&self) -> &Drivetrain {
        &self.drivetrain
    }

    #[inline]
    pub fn body(&self) -> &B {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    #[inline]
    pub fn rng_mut(&mut self) -> &mut AgentRng {
        &mut self.rng
    }

    #[inline]
    pub fn state(&self) -> DrivingState {
        self.driver.state()
    }

    /// Controls produced by the last tick.
    #[inline]
    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Wheel commands written to the body on the last tick.
    #[inline]
    pub fn wheel_commands(&self) -> &[WheelCommand; WHEEL_COUNT] {
        &self.wheels
    }

    pub fn distance_to_destination(&self) -> f32 {
        self.driver.distance_to_destination(self.body.position())
    }

    pub fn emergency_stop(&mut self) {
        self.driver.emergency_stop();
    }

    /// What the driver sees of the body right now.
    pub fn perceive(&self) -> Perception {
        Perception {
            position:         self.body.position(),
            rotation:         self.body.rotation(),
            velocity:         self.body.linear_velocity(),
            angular_velocity: self.body.angular_velocity(),
            top_speed:        self.drivetrain.top_speed_mps(),
        }
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Clear the old claim, decide, claim again, then drive the wheels.
    ///
    /// The body is not integrated here; the caller does that after every
    /// agent has ticked.
    pub fn tick(&mut self, graph: &WaypointGraph, grid: &mut ReservationGrid, dt: f32) -> Vec<DriverEvent> {
        let perception = self.perceive();
        grid.clear_reservations(self.id);
        let decision = {
            let ctx = DriveContext::new(graph, grid, dt);
            self.driver.update(&perception, &ctx, &mut self.rng)
        };
        grid.register(decision.reservation);

        self.controls = decision.controls;
        self.wheels = self.drivetrain.step(&decision.controls, &mut self.body, dt);
        decision.events
    }
}
