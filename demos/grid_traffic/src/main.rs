//! grid_traffic — a mixed fleet driving around a synthetic downtown.
//!
//! Usage: `grid_traffic [sim_config.json]`
//!
//! The optional JSON file is a `SimConfig`; missing fields keep their
//! defaults.  Set `RUST_LOG=av_driver=debug` to watch state changes.

mod city;

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use av_core::{AgentId, BehaviorProfile, ExperienceLevel, NodeId, SimConfig, Tick, Vec3};
use av_driver::DrivingState;
use av_sim::{AgentSpec, KinematicBody, SimBuilder, SimObserver};

use city::build_city;

// ── Constants ─────────────────────────────────────────────────────────────────

const CITY_SIDE:      usize = 6;
const BLOCK_METRES:   f32   = 40.0;
const VEHICLE_COUNT:  usize = 12;
const REPORT_EVERY:   u64   = 500;

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct FleetStats {
    routes:       usize,
    arrivals:     usize,
    truncated:    usize,
    overtakes:    usize,
    reversals:    usize,
    emergencies:  usize,
    peak_driving: usize,
}

impl SimObserver for FleetStats {
    fn on_tick_end(&mut self, tick: Tick, driving: usize) {
        self.peak_driving = self.peak_driving.max(driving);
        if tick.0.is_multiple_of(REPORT_EVERY) {
            info!(%tick, driving, arrivals = self.arrivals, "progress");
        }
    }

    fn on_state_changed(&mut self, _tick: Tick, _agent: AgentId, _from: DrivingState, to: DrivingState) {
        match to {
            DrivingState::Overtake      => self.overtakes += 1,
            DrivingState::Reverse       => self.reversals += 1,
            DrivingState::EmergencyStop => self.emergencies += 1,
            DrivingState::Park | DrivingState::Normal => {}
        }
    }

    fn on_route_built(&mut self, _: Tick, _: AgentId, _: NodeId, _: NodeId, _: usize) {
        self.routes += 1;
    }

    fn on_path_completed(&mut self, _: Tick, _: AgentId, _: NodeId, reached_destination: bool) {
        if reached_destination {
            self.arrivals += 1;
        } else {
            self.truncated += 1;
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config() -> Result<SimConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
        }
        None => Ok(SimConfig { total_ticks: 6_000, ..SimConfig::default() }),
    }
}

/// Cycle through profiles and experience levels so every mix is present.
fn fleet_spec(i: usize) -> AgentSpec {
    const PROFILES: [BehaviorProfile; 3] =
        [BehaviorProfile::Traffic, BehaviorProfile::Pursuit, BehaviorProfile::Racing];
    const LEVELS: [ExperienceLevel; 3] =
        [ExperienceLevel::Novice, ExperienceLevel::MidLevel, ExperienceLevel::Expert];
    AgentSpec::new(PROFILES[i % PROFILES.len()], LEVELS[(i / PROFILES.len()) % LEVELS.len()])
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== grid_traffic ===");
    let config = load_config()?;
    println!(
        "City: {CITY_SIDE}×{CITY_SIDE} blocks of {BLOCK_METRES} m  |  Vehicles: {VEHICLE_COUNT}  |  Seed: {}",
        config.seed
    );
    println!(
        "Sim: {} ticks at {} s ({:.0} s simulated)",
        config.total_ticks,
        config.tick_seconds,
        config.total_ticks as f32 * config.tick_seconds
    );
    println!();

    // 1. Road graph.
    let (graph, ids) = build_city(CITY_SIDE, BLOCK_METRES)?;

    // 2. Vehicles: spread over the intersections, each a few metres short of
    //    its node and facing along the street.
    let mut builder = SimBuilder::new(config, graph);
    for i in 0..VEHICLE_COUNT {
        let node = (i * 7) % ids.len();
        let col = (node % CITY_SIDE) as f32;
        let row = (node / CITY_SIDE) as f32;
        let position = Vec3::new(col * BLOCK_METRES, 0.0, row * BLOCK_METRES - 6.0);
        builder = builder.agent(fleet_spec(i), KinematicBody::at(position, Vec3::Z));
    }
    let mut sim = builder.build()?;

    // 3. Run, pulling the first vehicle over halfway through.
    let mut stats = FleetStats::default();
    let halfway = sim.config.total_ticks / 2;
    let t0 = Instant::now();
    sim.run_ticks(halfway, &mut stats);
    sim.emergency_stop(AgentId(0))?;
    sim.run(&mut stats);
    let elapsed = t0.elapsed();

    // 4. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  routes built    : {}", stats.routes);
    println!("  arrivals        : {}", stats.arrivals);
    println!("  truncated routes: {}", stats.truncated);
    println!("  overtakes       : {}", stats.overtakes);
    println!("  reversals       : {}", stats.reversals);
    println!("  emergency stops : {}", stats.emergencies);
    println!("  peak driving    : {}", stats.peak_driving);
    println!();

    println!("{:<8} {:<8} {:<8} {:<10} {:>10}", "Agent", "Profile", "Level", "State", "To dest");
    println!("{}", "-".repeat(48));
    for agent in sim.agents() {
        let driver = agent.driver();
        let distance = agent.distance_to_destination();
        let shown = if distance.is_finite() { format!("{distance:.1} m") } else { "-".to_owned() };
        println!(
            "{:<8} {:<8} {:<8} {:<10} {:>10}",
            agent.id().0,
            driver.profile().as_str(),
            driver.experience().as_str(),
            agent.state().as_str(),
            shown,
        );
    }

    Ok(())
}
