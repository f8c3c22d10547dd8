//! Strongly typed handles for vehicles and road-graph nodes.
//!
//! Nodes live in a flat arena owned by the waypoint graph and agents live in
//! a `Vec` owned by the simulation, so both are referenced by index rather
//! than by pointer.  The inner integer is `pub` for direct indexing, but
//! callers should prefer `.index()`.

use std::fmt;

/// Generate a typed handle around a `u32` arena index.
macro_rules! arena_handle {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel for "no handle".
            pub const INVALID: $name = $name(u32::MAX);

            /// Cast to `usize` for use as an arena index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

arena_handle! {
    /// Index of a vehicle agent.  Also the ownership key for reservations.
    pub struct AgentId;
}

arena_handle! {
    /// Index of a waypoint in the road graph arena.
    pub struct NodeId;
}
