//! The reservation grid.
//!
//! # Layout
//!
//! ```text
//! cells:   CellCoord → Vec<Reservation>      (uniform spatial hash on X/Z)
//! touched: AgentId   → Vec<CellCoord>        (reverse index for removal)
//! pool:    Vec<Vec<Reservation>>             (recycled empty cell lists)
//! ```
//!
//! The reverse index makes [`clear_reservations`](ReservationGrid::clear_reservations)
//! proportional to the cells one agent touched (normally one) instead of the
//! whole grid.  Emptied cell lists go back to the pool so a steady-state tick
//! does not allocate.
//!
//! # Cell size
//!
//! A conflict query scans the candidate's cell and its 8 neighbors.  That is
//! exhaustive only when `cell_size >= 2 * max_radius`; larger radii can miss
//! overlaps with reservations two cells away.

use rustc_hash::FxHashMap;

use av_core::{AgentId, Vec3};

use crate::{GridError, GridResult};

// ── Reservation ───────────────────────────────────────────────────────────────

/// A circular claim on near-future road space.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reservation {
    pub agent:    AgentId,
    pub position: Vec3,
    pub radius:   f32,
}

impl Reservation {
    #[inline]
    pub fn new(agent: AgentId, position: Vec3, radius: f32) -> Self {
        Self { agent, position, radius }
    }

    /// Strict overlap: centers closer than the sum of radii.  Symmetric.
    #[inline]
    pub fn overlaps(&self, other: &Reservation) -> bool {
        let reach = self.radius + other.radius;
        self.position.distance_squared(other.position) < reach * reach
    }
}

// ── CellCoord ─────────────────────────────────────────────────────────────────

/// Integer grid cell on the ground plane.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    #[inline]
    pub fn of(position: Vec3, cell_size: f32) -> Self {
        Self {
            x: (position.x / cell_size).floor() as i32,
            z: (position.z / cell_size).floor() as i32,
        }
    }

    /// This cell and its 8 neighbors.
    pub fn neighborhood(self) -> impl Iterator<Item = CellCoord> {
        (-1..=1).flat_map(move |dz| {
            (-1..=1).map(move |dx| CellCoord {
                x: self.x.wrapping_add(dx),
                z: self.z.wrapping_add(dz),
            })
        })
    }
}

// ── ReservationGrid ───────────────────────────────────────────────────────────

pub struct ReservationGrid {
    cell_size: f32,
    cells:     FxHashMap<CellCoord, Vec<Reservation>>,
    touched:   FxHashMap<AgentId, Vec<CellCoord>>,
    pool:      Vec<Vec<Reservation>>,
}

impl ReservationGrid {
    /// Create a grid with the given cell edge length.
    ///
    /// # Errors
    ///
    /// `InvalidCellSize` unless `cell_size` is positive and finite.
    pub fn new(cell_size: f32) -> GridResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            cells:   FxHashMap::default(),
            touched: FxHashMap::default(),
            pool:    Vec::new(),
        })
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Whether a reservation of `radius` is always caught by the 3×3 scan.
    #[inline]
    pub fn supports_radius(&self, radius: f32) -> bool {
        2.0 * radius <= self.cell_size
    }

    /// Total reservations across all cells.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Every reservation currently owned by `agent`.
    pub fn reservations_of(&self, agent: AgentId) -> Vec<Reservation> {
        let Some(cells) = self.touched.get(&agent) else {
            return Vec::new();
        };
        cells
            .iter()
            .filter_map(|cell| self.cells.get(cell))
            .flat_map(|list| list.iter().filter(|r| r.agent == agent).copied())
            .collect()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Insert `reservation` into the cell containing its center.
    pub fn register(&mut self, reservation: Reservation) {
        let cell = CellCoord::of(reservation.position, self.cell_size);
        let pool = &mut self.pool;
        self.cells
            .entry(cell)
            .or_insert_with(|| pool.pop().unwrap_or_default())
            .push(reservation);

        let cells = self.touched.entry(reservation.agent).or_default();
        if !cells.contains(&cell) {
            cells.push(cell);
        }
    }

    /// Remove every reservation owned by `agent`.
    pub fn clear_reservations(&mut self, agent: AgentId) {
        let Some(cells) = self.touched.remove(&agent) else {
            return;
        };
        for cell in cells {
            let Some(list) = self.cells.get_mut(&cell) else {
                continue;
            };
            list.retain(|r| r.agent != agent);
            if list.is_empty() {
                if let Some(list) = self.cells.remove(&cell) {
                    self.pool.push(list);
                }
            }
        }
    }

    /// Drop everything, keeping allocated lists in the pool.
    pub fn clear(&mut self) {
        for (_, mut list) in self.cells.drain() {
            list.clear();
            self.pool.push(list);
        }
        self.touched.clear();
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// First reservation by a *different* agent that overlaps `candidate`,
    /// scanning the candidate's cell and its 8 neighbors.
    pub fn check_conflict(&self, candidate: &Reservation) -> Option<Reservation> {
        CellCoord::of(candidate.position, self.cell_size)
            .neighborhood()
            .filter_map(|cell| self.cells.get(&cell))
            .flat_map(|list| list.iter())
            .find(|r| r.agent != candidate.agent && r.overlaps(candidate))
            .copied()
    }

    /// `true` if [`check_conflict`](Self::check_conflict) finds anything.
    #[inline]
    pub fn has_conflict(&self, candidate: &Reservation) -> bool {
        self.check_conflict(candidate).is_some()
    }
}
