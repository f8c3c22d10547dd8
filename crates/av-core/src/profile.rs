//! Per-agent tuning enums supplied by the authoring layer.
//!
//! Both are plain `Copy` tags; the numbers they imply live in the methods
//! below so every crate reads the same table.

/// How well a driver knows the road graph.
///
/// Experts always pick the neighbor closest to the destination; everyone
/// else flips a weighted coin per hop and sometimes wanders.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExperienceLevel {
    Novice,
    #[default]
    MidLevel,
    Expert,
}

impl ExperienceLevel {
    /// `true` if route building never randomizes successor choice.
    #[inline]
    pub fn always_greedy(self) -> bool {
        matches!(self, ExperienceLevel::Expert)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Novice   => "novice",
            ExperienceLevel::MidLevel => "mid_level",
            ExperienceLevel::Expert   => "expert",
        }
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driving temperament.
///
/// | Profile | Speed factor | Overtake aggression |
/// |---------|--------------|---------------------|
/// | Traffic | 1.0          | 0.8                 |
/// | Pursuit | 1.2          | 1.0                 |
/// | Racing  | 1.5          | 1.3                 |
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorProfile {
    /// Commuter traffic.  Yields (parks) when boxed in at low speed.
    #[default]
    Traffic,
    Pursuit,
    /// Holds its lane and blocks instead of overtaking.
    Racing,
}

impl BehaviorProfile {
    /// Multiplier applied to the vehicle's base top speed.
    #[inline]
    pub fn speed_factor(self) -> f32 {
        match self {
            BehaviorProfile::Traffic => 1.0,
            BehaviorProfile::Pursuit => 1.2,
            BehaviorProfile::Racing  => 1.5,
        }
    }

    /// Multiplier applied to desired speed while overtaking.
    #[inline]
    pub fn aggression(self) -> f32 {
        match self {
            BehaviorProfile::Traffic => 0.8,
            BehaviorProfile::Pursuit => 1.0,
            BehaviorProfile::Racing  => 1.3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorProfile::Traffic => "traffic",
            BehaviorProfile::Pursuit => "pursuit",
            BehaviorProfile::Racing  => "racing",
        }
    }
}

impl std::fmt::Display for BehaviorProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
