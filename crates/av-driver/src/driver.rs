//! The per-vehicle driving state machine.
//!
//! | State         | Leaves for                                               |
//! |---------------|----------------------------------------------------------|
//! | Park          | Normal once a route is built after the dwell             |
//! | Normal        | Park on arrival or commuter yield, Reverse when stuck, Overtake on conflict |
//! | Reverse       | Normal after the max duration, or after the min once stopped |
//! | Overtake      | Normal after the overtake duration                       |
//! | EmergencyStop | Normal after its duration                                |
//!
//! All timers are plain fields advanced by `dt` in [`Driver::update`].

use av_core::{AgentId, AgentRng, BehaviorProfile, Controls, ExperienceLevel, NodeId, Vec3};
use av_graph::{ProgressTracker, Route, WaypointGraph};
use av_reservation::Reservation;
use tracing::{debug, trace};

use crate::steering::{desired_speed, drive_toward};
use crate::{DriveContext, DriverConfig, DriverEvent, DriverResult, DrivingState, Perception};

/// Output of one [`Driver::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub controls:    Controls,
    /// Space claimed for this tick; the caller registers it in the grid.
    pub reservation: Reservation,
    pub events:      Vec<DriverEvent>,
}

#[derive(Clone, Debug)]
pub struct Driver {
    agent:         AgentId,
    config:        DriverConfig,
    profile:       BehaviorProfile,
    experience:    ExperienceLevel,

    state:         DrivingState,
    route:         Route,
    tracker:       ProgressTracker,

    /// Seconds since the last state change.
    state_time:    f32,
    /// Seconds spent below `stuck_speed` in Normal.
    stuck_time:    f32,
    /// `±1`, drawn on entering Overtake.
    overtake_sign: f32,

    events:        Vec<DriverEvent>,
}

impl Driver {
    /// A parked driver with no route.
    ///
    /// # Errors
    ///
    /// `Config` if `config` fails [`DriverConfig::validate`].
    pub fn new(
        agent:      AgentId,
        config:     DriverConfig,
        profile:    BehaviorProfile,
        experience: ExperienceLevel,
    ) -> DriverResult<Self> {
        config.validate()?;
        Ok(Self {
            agent,
            tracker: ProgressTracker::new(config.tracker.clone()),
            config,
            profile,
            experience,
            state: DrivingState::Park,
            route: Route::default(),
            state_time: 0.0,
            stuck_time: 0.0,
            overtake_sign: 1.0,
            events: Vec::new(),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    #[inline]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    #[inline]
    pub fn profile(&self) -> BehaviorProfile {
        self.profile
    }

    #[inline]
    pub fn experience(&self) -> ExperienceLevel {
        self.experience
    }

    #[inline]
    pub fn state(&self) -> DrivingState {
        self.state
    }

    #[inline]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Arc length covered on the current route.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.tracker.progress()
    }

    #[inline]
    pub fn time_in_state(&self) -> f32 {
        self.state_time
    }

    /// Straight-line distance to the intended destination, `f32::INFINITY`
    /// without a route.
    pub fn distance_to_destination(&self, position: Vec3) -> f32 {
        self.route.distance_to_destination(position)
    }

    // ── External commands ─────────────────────────────────────────────────

    /// Replace the route and start driving it.
    pub fn assign_route(&mut self, route: Route) {
        if route.is_empty() {
            self.route.clear();
            self.tracker.reset();
            self.transition(DrivingState::Park);
            return;
        }
        self.install_route(route);
        self.transition(DrivingState::Normal);
    }

    /// Build a route from `start` to `destination` and start driving it.
    ///
    /// # Errors
    ///
    /// `Graph` if either node is unknown.  The current route is kept.
    pub fn route_to(
        &mut self,
        graph:       &WaypointGraph,
        start:       NodeId,
        destination: NodeId,
        rng:         &mut AgentRng,
    ) -> DriverResult<()> {
        let route = Route::build(graph, self.experience, start, destination, &self.config.route, rng)?;
        self.assign_route(route);
        Ok(())
    }

    /// Stop immediately.  Leaves for Normal after `emergency_stop_duration`;
    /// calling again restarts the timer.
    pub fn emergency_stop(&mut self) {
        if self.state == DrivingState::EmergencyStop {
            self.state_time = 0.0;
        } else {
            self.transition(DrivingState::EmergencyStop);
        }
    }

    /// Events produced outside [`update`](Self::update), e.g. by
    /// [`emergency_stop`](Self::emergency_stop), are returned by the next update.
    pub fn take_events(&mut self) -> Vec<DriverEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// The reservation this driver would claim at `p`.
    pub fn reservation_candidate(&self, p: &Perception) -> Reservation {
        let shape = &self.config.reservation;
        let speed = p.speed();
        Reservation::new(self.agent, p.position + p.forward() * shape.lookahead(speed), shape.radius(speed))
    }

    /// Advance timers, run the active state, and return controls plus the
    /// reservation to register.
    ///
    /// The caller must already have cleared this agent's previous
    /// reservation from `ctx.grid`.
    pub fn update(&mut self, p: &Perception, ctx: &DriveContext<'_>, rng: &mut AgentRng) -> Decision {
        self.state_time += ctx.dt;
        let reservation = self.reservation_candidate(p);

        let controls = match self.state {
            DrivingState::Park          => self.park(p, ctx.graph, rng),
            DrivingState::Normal        => self.normal(p, ctx, &reservation, rng),
            DrivingState::Reverse       => self.reverse(p),
            DrivingState::Overtake      => self.overtake(p),
            DrivingState::EmergencyStop => self.emergency(),
        };

        trace!(
            agent = %self.agent, state = %self.state,
            steering = controls.steering, throttle = controls.throttle, brake = controls.brake,
            "driver update"
        );
        Decision { controls, reservation, events: self.take_events() }
    }

    // ── States ────────────────────────────────────────────────────────────

    fn park(&mut self, p: &Perception, graph: &WaypointGraph, rng: &mut AgentRng) -> Controls {
        if self.state_time >= self.config.park_duration {
            if self.build_route(p, graph, rng) {
                self.transition(DrivingState::Normal);
            } else {
                // Try again after another dwell.
                self.state_time = 0.0;
            }
        }
        Controls::HOLD
    }

    fn normal(
        &mut self,
        p:           &Perception,
        ctx:         &DriveContext<'_>,
        reservation: &Reservation,
        rng:         &mut AgentRng,
    ) -> Controls {
        if self.route.is_empty() {
            self.transition(DrivingState::Park);
            return Controls::HOLD;
        }

        self.tracker.advance(&self.route, p.position);
        if self.tracker.is_complete(&self.route, p.position) {
            self.complete_route();
            return Controls::HOLD;
        }

        let speed = p.forward_speed();
        if speed.abs() < self.config.stuck_speed {
            self.stuck_time += ctx.dt;
        } else {
            self.stuck_time = 0.0;
        }
        if self.stuck_time > self.config.stuck_time {
            debug!(agent = %self.agent, stuck_for = self.stuck_time, "stuck, backing up");
            self.transition(DrivingState::Reverse);
            return self.reverse(p);
        }

        let target = self.tracker.target(&self.route, speed.max(0.0));
        let mut desired = desired_speed(&self.config, p, &target);

        if let Some(other) = ctx.grid.check_conflict(reservation) {
            match self.profile {
                BehaviorProfile::Racing => {
                    trace!(agent = %self.agent, other = %other.agent, "holding lane");
                    desired *= self.config.block_slowdown;
                }
                // Of two slow commuters only the higher id yields.
                BehaviorProfile::Traffic
                    if speed.abs() < self.config.yield_speed && other.agent < self.agent =>
                {
                    debug!(agent = %self.agent, other = %other.agent, "yielding");
                    self.route.clear();
                    self.tracker.reset();
                    self.transition(DrivingState::Park);
                    return Controls::HOLD;
                }
                _ => {
                    self.overtake_sign = rng.sign();
                    debug!(
                        agent = %self.agent, other = %other.agent, side = self.overtake_sign,
                        "overtaking"
                    );
                    self.transition(DrivingState::Overtake);
                    return self.overtake(p);
                }
            }
        }

        drive_toward(&self.config, p, target.position, desired, false)
    }

    fn reverse(&mut self, p: &Perception) -> Controls {
        let elapsed = self.state_time;
        let done = elapsed >= self.config.reverse_max_duration
            || (elapsed >= self.config.reverse_min_duration && p.speed() < self.config.stopped_speed);
        if done {
            self.transition(DrivingState::Normal);
            return Controls::IDLE;
        }
        let target = self.tracker.target(&self.route, 0.0);
        drive_toward(&self.config, p, target.position, self.config.reverse_speed, true)
    }

    fn overtake(&mut self, p: &Perception) -> Controls {
        let speed = p.forward_speed();
        self.tracker.advance(&self.route, p.position);
        let target = self.tracker.target(&self.route, speed.max(0.0));

        let right = Vec3::Y.cross(target.direction);
        let aim = target.position + right * (self.config.overtake_offset * self.overtake_sign);
        let desired = desired_speed(&self.config, p, &target) * self.profile.aggression();
        let controls = drive_toward(&self.config, p, aim, desired, false);

        if self.state_time >= self.config.overtake_duration {
            self.transition(DrivingState::Normal);
        }
        controls
    }

    fn emergency(&mut self) -> Controls {
        if self.state_time >= self.config.emergency_stop_duration {
            self.transition(DrivingState::Normal);
        }
        Controls::HOLD
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn transition(&mut self, to: DrivingState) {
        let from = self.state;
        if from == to {
            return;
        }
        debug!(agent = %self.agent, %from, %to, "state change");
        self.events.push(DriverEvent::StateChanged { from, to });
        self.state = to;
        self.state_time = 0.0;
        self.stuck_time = 0.0;
    }

    /// Pick a start ahead of the vehicle and a random destination, then
    /// build the route.  `false` leaves the driver parked.
    fn build_route(&mut self, p: &Perception, graph: &WaypointGraph, rng: &mut AgentRng) -> bool {
        let Some(start) = graph.closest_node_in_front_of(p.position, p.forward(), self.config.view_angle)
        else {
            debug!(agent = %self.agent, "no road to route over");
            return false;
        };
        let Some(destination) = graph.random_destination(start, rng) else {
            debug!(agent = %self.agent, %start, "no destination candidate");
            return false;
        };
        match Route::build(graph, self.experience, start, destination, &self.config.route, rng) {
            Ok(route) => {
                self.install_route(route);
                true
            }
            Err(err) => {
                debug!(agent = %self.agent, %err, "route build failed");
                false
            }
        }
    }

    fn install_route(&mut self, route: Route) {
        if let (Some(&start), Some(destination)) = (route.nodes().first(), route.destination()) {
            debug!(
                agent = %self.agent, %start, %destination, hops = route.len() - 1,
                reaches = route.reaches_destination(), "route assigned"
            );
            self.events.push(DriverEvent::RouteBuilt {
                start,
                destination,
                hops: route.len() - 1,
                reaches_destination: route.reaches_destination(),
            });
        }
        self.route = route;
        self.tracker.reset();
    }

    fn complete_route(&mut self) {
        if let Some(last_node) = self.route.last_node() {
            let reached_destination = self.route.reaches_destination();
            debug!(agent = %self.agent, %last_node, reached_destination, "path completed");
            self.events.push(DriverEvent::PathCompleted { last_node, reached_destination });
        }
        self.route.clear();
        self.tracker.reset();
        self.transition(DrivingState::Park);
    }
}
