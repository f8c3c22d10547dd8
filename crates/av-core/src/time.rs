//! Fixed-step simulation time.
//!
//! Every agent advances exactly once per `Tick`; the mapping to simulated
//! seconds is a constant step held by `SimClock`:
//!
//!   elapsed_secs = tick * tick_seconds
//!
//! The integer tick is the canonical time unit for ordering; per-agent timers
//! (stuck time, reverse duration, …) accumulate `tick_seconds` as `f32`.

use std::fmt;

use crate::CoreError;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and converts it to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per tick (the physics step).
    pub tick_seconds: f32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_seconds: f32) -> Self {
        Self { tick_seconds, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.tick_seconds as f64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Seconds per tick.  Default: 0.02 (50 Hz, a common physics rate).
    pub tick_seconds: f32,

    /// Ticks simulated by `Sim::run`.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed and agent order reproduce a run exactly.
    pub seed: u64,

    /// Edge length of a reservation-grid cell in world units.  Must be at
    /// least twice the largest reservation radius for the 3×3 neighborhood
    /// scan to be exhaustive.
    pub reservation_cell_size: f32,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_seconds)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.tick_seconds > 0.0) {
            return Err(CoreError::Config(format!(
                "tick_seconds must be positive, got {}",
                self.tick_seconds
            )));
        }
        if !(self.reservation_cell_size > 0.0) {
            return Err(CoreError::Config(format!(
                "reservation_cell_size must be positive, got {}",
                self.reservation_cell_size
            )));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_seconds:          0.02,
            total_ticks:           3_000,
            seed:                  42,
            reservation_cell_size: 16.0,
        }
    }
}
