//! The five driving states.

/// Exactly one is active per driver.  Initial state is [`Park`](Self::Park).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrivingState {
    /// Stationary without a route; routes again after a dwell.
    #[default]
    Park,
    /// Following the route.
    Normal,
    /// Backing out after getting stuck.
    Reverse,
    /// Passing with a lateral target offset.
    Overtake,
    /// Full stop requested from outside.
    EmergencyStop,
}

impl DrivingState {
    pub fn as_str(self) -> &'static str {
        match self {
            DrivingState::Park          => "park",
            DrivingState::Normal        => "normal",
            DrivingState::Reverse       => "reverse",
            DrivingState::Overtake      => "overtake",
            DrivingState::EmergencyStop => "emergency_stop",
        }
    }

    /// States in which the vehicle follows its route.
    #[inline]
    pub fn is_driving(self) -> bool {
        matches!(self, DrivingState::Normal | DrivingState::Overtake | DrivingState::Reverse)
    }
}

impl std::fmt::Display for DrivingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
